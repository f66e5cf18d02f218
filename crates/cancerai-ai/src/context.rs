//! Process-wide prediction state, built once at startup and shared by every
//! request.

use std::sync::Arc;

use cancerai_core::{EncoderTable, PatientRecord};

use crate::classifier::ClassifierPort;
use crate::drug_response::{DrugResponsePredictionService, DrugResponseReport};
use crate::error::PredictionError;
use crate::survival::{SurvivalPredictionService, SurvivalReport};

/// Loaded artifacts wired into both prediction services.
///
/// Cloning is cheap and every clone shares the same read-only encoder table
/// and classifiers.
#[derive(Clone)]
pub struct PredictionContext {
    survival: SurvivalPredictionService,
    drug_response: DrugResponsePredictionService,
}

impl PredictionContext {
    pub fn new(
        encoders: EncoderTable,
        survival: Arc<dyn ClassifierPort>,
        drug_response: Arc<dyn ClassifierPort>,
    ) -> Self {
        let encoders = Arc::new(encoders);
        Self {
            survival: SurvivalPredictionService::new(Arc::clone(&encoders), survival),
            drug_response: DrugResponsePredictionService::new(encoders, drug_response),
        }
    }

    pub fn predict_survival(
        &self,
        record: &PatientRecord,
    ) -> Result<SurvivalReport, PredictionError> {
        self.survival.predict(record)
    }

    pub fn predict_drug_response(
        &self,
        record: &PatientRecord,
    ) -> Result<DrugResponseReport, PredictionError> {
        self.drug_response.predict(record)
    }
}
