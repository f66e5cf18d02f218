//! Five-year survival prediction.

use std::sync::Arc;

use cancerai_core::{EncoderTable, Field, ModelCard, PatientRecord, encode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::classifier::{ClassifierPort, ClassifierRole};
use crate::error::PredictionError;

/// Class index of "survived" in the survival model's output.
pub const SURVIVED: usize = 1;
/// Class index of "did not survive".
pub const DIED: usize = 0;

/// Survival probability above which risk is low.
pub const LOW_RISK_ABOVE: f64 = 0.7;
/// Survival probability above which (and up to [`LOW_RISK_ABOVE`]) risk is medium.
pub const MEDIUM_RISK_ABOVE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// Bucket a survival probability. Both thresholds are exclusive lower bounds.
    pub fn from_survival_probability(p: f64) -> Self {
        if p > LOW_RISK_ABOVE {
            Self::Low
        } else if p > MEDIUM_RISK_ABOVE {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalPrediction {
    pub survived: bool,
    pub survival_probability: f64,
    pub death_probability: f64,
    pub confidence: f64,
    pub risk_category: RiskCategory,
}

/// Patient attributes echoed back exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalPatient {
    pub age: Value,
    pub sex: Value,
    pub cancer_type: Value,
    pub stage: Value,
    pub tumor_size_cm: Value,
}

impl SurvivalPatient {
    fn echo(record: &PatientRecord) -> Self {
        Self {
            age: record.echo(Field::Age),
            sex: record.echo(Field::Sex),
            cancer_type: record.echo(Field::CancerType),
            stage: record.echo(Field::Stage),
            tumor_size_cm: record.echo(Field::TumorSizeCm),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalReport {
    pub prediction: SurvivalPrediction,
    pub patient: SurvivalPatient,
    pub model: &'static ModelCard,
}

/// Validates, encodes, and scores records against the survival model.
#[derive(Clone)]
pub struct SurvivalPredictionService {
    encoders: Arc<EncoderTable>,
    classifier: Arc<dyn ClassifierPort>,
}

impl SurvivalPredictionService {
    pub fn new(encoders: Arc<EncoderTable>, classifier: Arc<dyn ClassifierPort>) -> Self {
        Self {
            encoders,
            classifier,
        }
    }

    /// Predict survival for one record.
    ///
    /// Every missing required field is reported before any inference runs.
    pub fn predict(&self, record: &PatientRecord) -> Result<SurvivalReport, PredictionError> {
        record.validate()?;

        let features = encode(record, &self.encoders)?;
        let result = self.classifier.classify(&features)?;

        let probs = &result.probabilities;
        let survival_probability = probs.require(SURVIVED)?;
        let death_probability = probs.require(DIED)?;
        let risk_category = RiskCategory::from_survival_probability(survival_probability);

        debug!(
            predicted_class = result.predicted_class,
            survival_probability,
            risk = risk_category.as_str(),
            "survival prediction"
        );

        Ok(SurvivalReport {
            prediction: SurvivalPrediction {
                survived: result.predicted_class == SURVIVED,
                survival_probability,
                death_probability,
                confidence: probs.confidence(),
                risk_category,
            },
            patient: SurvivalPatient::echo(record),
            model: ClassifierRole::Survival.card(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::*;
    use serde_json::json;

    fn service(classifier: Arc<dyn ClassifierPort>) -> SurvivalPredictionService {
        SurvivalPredictionService::new(Arc::new(encoders()), classifier)
    }

    #[test]
    fn risk_thresholds_are_exclusive() {
        assert_eq!(RiskCategory::from_survival_probability(0.7), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_survival_probability(0.71), RiskCategory::Low);
        assert_eq!(RiskCategory::from_survival_probability(0.4), RiskCategory::High);
        assert_eq!(RiskCategory::from_survival_probability(0.4001), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_survival_probability(1.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_survival_probability(0.0), RiskCategory::High);
    }

    #[test]
    fn breast_cancer_scenario_is_low_risk() {
        let clf = FixedClassifier::new(1, &[0.25, 0.75]);
        let report = service(clf.clone()).predict(&scenario_record()).unwrap();

        assert!(report.prediction.survived);
        assert_eq!(report.prediction.survival_probability, 0.75);
        assert_eq!(report.prediction.death_probability, 0.25);
        assert_eq!(report.prediction.confidence, 0.75);
        assert_eq!(report.prediction.risk_category, RiskCategory::Low);
        assert_eq!(clf.calls(), 1);
    }

    #[test]
    fn survived_follows_predicted_class() {
        let clf = FixedClassifier::new(0, &[0.55, 0.45]);
        let report = service(clf).predict(&scenario_record()).unwrap();
        assert!(!report.prediction.survived);
        assert_eq!(report.prediction.risk_category, RiskCategory::Medium);
        assert_eq!(report.prediction.confidence, 0.55);
    }

    #[test]
    fn missing_stage_rejected_without_inference() {
        let clf = FixedClassifier::binary(0.9);
        let err = service(clf.clone())
            .predict(&record_without("stage"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.missing_fields(), &[Field::Stage]);
        assert_eq!(clf.calls(), 0);
    }

    #[test]
    fn every_missing_field_reported() {
        let mut record = scenario_json();
        let map = record.as_object_mut().unwrap();
        map.remove("grade");
        map.remove("sex");
        let err = service(FixedClassifier::binary(0.9))
            .predict(&PatientRecord::from_value(record))
            .unwrap_err();
        assert_eq!(err.missing_fields(), &[Field::Sex, Field::Grade]);
    }

    #[test]
    fn non_numeric_age_is_encoding_error() {
        let clf = FixedClassifier::binary(0.9);
        let err = service(clf.clone())
            .predict(&record_with("age", json!("fifty-eight")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(clf.calls(), 0);
    }

    #[test]
    fn classifier_failure_is_inference_error() {
        let err = service(Arc::new(FailingClassifier))
            .predict(&scenario_record())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);
        assert!(err.to_string().contains("model graph is corrupt"));
    }

    #[test]
    fn single_class_model_is_inference_error() {
        let clf = FixedClassifier::new(0, &[1.0]);
        let err = service(clf).predict(&scenario_record()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);
    }

    #[test]
    fn unknown_category_still_predicts() {
        let report = service(FixedClassifier::binary(0.3))
            .predict(&record_with("cancer_type", json!("Glioblastoma")))
            .unwrap();
        assert_eq!(report.prediction.risk_category, RiskCategory::High);
        assert_eq!(report.patient.cancer_type, json!("Glioblastoma"));
    }

    #[test]
    fn report_json_shape() {
        let report = service(FixedClassifier::new(1, &[0.25, 0.75]))
            .predict(&record_with("age", json!("58")))
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["prediction"]["risk_category"], "Low");
        assert_eq!(json["prediction"]["survived"], true);
        assert_eq!(json["patient"]["age"], "58");
        assert_eq!(json["patient"]["tumor_size_cm"], 3.2);
        assert!(json["patient"].get("treatment").is_none());
        assert_eq!(json["model"]["name"], "Gradient Boosting Classifier");
        assert_eq!(json["model"]["cross_validation"], "85.5% (±4.9%)");
    }
}
