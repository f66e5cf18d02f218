//! Drug-response prediction.

use std::sync::Arc;

use cancerai_core::{EncoderTable, Field, ModelCard, PatientRecord, encode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::classifier::{ClassifierPort, ClassifierRole};
use crate::error::PredictionError;

/// Response probability above which the response is complete.
pub const COMPLETE_RESPONSE_ABOVE: f64 = 0.8;
/// Response probability above which (and up to [`COMPLETE_RESPONSE_ABOVE`])
/// the response is partial.
pub const PARTIAL_RESPONSE_ABOVE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseType {
    #[serde(rename = "Complete Response")]
    Complete,
    #[serde(rename = "Partial Response")]
    Partial,
    #[serde(rename = "No Response")]
    NoResponse,
}

impl ResponseType {
    pub fn from_response_probability(p: f64) -> Self {
        if p > COMPLETE_RESPONSE_ABOVE {
            Self::Complete
        } else if p > PARTIAL_RESPONSE_ABOVE {
            Self::Partial
        } else {
            Self::NoResponse
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "Complete Response",
            Self::Partial => "Partial Response",
            Self::NoResponse => "No Response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugResponsePrediction {
    pub response_type: ResponseType,
    pub response_probability: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugResponsePatient {
    pub cancer_type: Value,
    pub stage: Value,
    pub treatment: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugResponseReport {
    pub prediction: DrugResponsePrediction,
    pub patient: DrugResponsePatient,
    pub model: &'static ModelCard,
}

/// Scores records against the drug-response model.
///
/// Applies the same field-presence check as survival prediction, so a
/// record missing a categorical field is rejected rather than silently
/// encoded with the fallback code.
#[derive(Clone)]
pub struct DrugResponsePredictionService {
    encoders: Arc<EncoderTable>,
    classifier: Arc<dyn ClassifierPort>,
}

impl DrugResponsePredictionService {
    pub fn new(encoders: Arc<EncoderTable>, classifier: Arc<dyn ClassifierPort>) -> Self {
        Self {
            encoders,
            classifier,
        }
    }

    pub fn predict(&self, record: &PatientRecord) -> Result<DrugResponseReport, PredictionError> {
        record.validate()?;

        let features = encode(record, &self.encoders)?;
        let result = self.classifier.classify(&features)?;

        let response_probability = result
            .probabilities
            .require(ClassifierRole::POSITIVE_CLASS)?;
        let response_type = ResponseType::from_response_probability(response_probability);

        debug!(
            predicted_class = result.predicted_class,
            response_probability,
            response = response_type.as_str(),
            "drug response prediction"
        );

        Ok(DrugResponseReport {
            prediction: DrugResponsePrediction {
                response_type,
                response_probability,
                confidence: result.probabilities.confidence(),
            },
            patient: DrugResponsePatient {
                cancer_type: record.echo(Field::CancerType),
                stage: record.echo(Field::Stage),
                treatment: record.echo(Field::Treatment),
            },
            model: ClassifierRole::DrugResponse.card(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::*;
    use serde_json::json;

    fn service(classifier: Arc<dyn ClassifierPort>) -> DrugResponsePredictionService {
        DrugResponsePredictionService::new(Arc::new(encoders()), classifier)
    }

    #[test]
    fn response_thresholds_are_exclusive() {
        assert_eq!(ResponseType::from_response_probability(0.8), ResponseType::Partial);
        assert_eq!(ResponseType::from_response_probability(0.81), ResponseType::Complete);
        assert_eq!(ResponseType::from_response_probability(0.5), ResponseType::NoResponse);
        assert_eq!(ResponseType::from_response_probability(0.5001), ResponseType::Partial);
        assert_eq!(ResponseType::from_response_probability(0.0), ResponseType::NoResponse);
    }

    #[test]
    fn breast_cancer_scenario_is_complete_response() {
        let clf = FixedClassifier::new(1, &[0.1, 0.9]);
        let report = service(clf).predict(&scenario_record()).unwrap();
        assert_eq!(report.prediction.response_type, ResponseType::Complete);
        assert_eq!(report.prediction.response_probability, 0.9);
        assert_eq!(report.prediction.confidence, 0.9);
    }

    #[test]
    fn reads_positive_class_of_three_way_model() {
        let clf = FixedClassifier::new(0, &[0.5, 0.3, 0.2]);
        let report = service(clf).predict(&scenario_record()).unwrap();
        assert_eq!(report.prediction.response_probability, 0.3);
        assert_eq!(report.prediction.response_type, ResponseType::NoResponse);
        assert_eq!(report.prediction.confidence, 0.5);
    }

    #[test]
    fn missing_fields_rejected_without_inference() {
        let mut record = scenario_json();
        let map = record.as_object_mut().unwrap();
        map.remove("sex");
        map.remove("grade");

        let clf = FixedClassifier::binary(0.9);
        let err = service(clf.clone())
            .predict(&PatientRecord::from_value(record))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.missing_fields(), &[Field::Sex, Field::Grade]);
        assert_eq!(clf.calls(), 0);
    }

    #[test]
    fn classifier_failure_is_inference_error() {
        let err = service(Arc::new(FailingClassifier))
            .predict(&scenario_record())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);
    }

    #[test]
    fn bad_tumor_size_is_encoding_error() {
        let err = service(FixedClassifier::binary(0.9))
            .predict(&record_with("tumor_size_cm", json!({"cm": 3})))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn report_json_shape() {
        let report = service(FixedClassifier::new(1, &[0.3, 0.7]))
            .predict(&scenario_record())
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["prediction"]["response_type"], "Partial Response");
        assert_eq!(json["patient"]["treatment"], "Surgery + Chemotherapy");
        assert!(json["patient"].get("age").is_none());
        assert_eq!(json["model"]["name"], "Random Forest Classifier");
        assert_eq!(json["model"]["accuracy"], "85.0%");
        assert!(json["model"].get("cross_validation").is_none());
    }
}
