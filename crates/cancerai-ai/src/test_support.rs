//! Classifier doubles and fixtures shared by the service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cancerai_core::{CategoricalField, EncoderTable, FeatureVector, PatientRecord};
use serde_json::{Value, json};

use crate::classifier::{ClassifierError, ClassifierPort, ProbabilityDistribution};

/// Returns the same label and probabilities for every input, counting calls.
pub struct FixedClassifier {
    class: usize,
    probs: Vec<f64>,
    calls: AtomicUsize,
}

impl FixedClassifier {
    pub fn new(class: usize, probs: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            class,
            probs: probs.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }

    /// Binary classifier whose label is the argmax of `[1 - p, p]`.
    pub fn binary(p: f64) -> Arc<Self> {
        Self::new(usize::from(p > 0.5), &[1.0 - p, p])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClassifierPort for FixedClassifier {
    fn predict(&self, _: &FeatureVector) -> Result<usize, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.class)
    }

    fn predict_proba(&self, _: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        ProbabilityDistribution::new(self.probs.clone())
    }
}

/// Fails every call, as a model with a broken graph would.
pub struct FailingClassifier;

impl ClassifierPort for FailingClassifier {
    fn predict(&self, _: &FeatureVector) -> Result<usize, ClassifierError> {
        Err(ClassifierError::Runtime("model graph is corrupt".into()))
    }

    fn predict_proba(&self, _: &FeatureVector) -> Result<ProbabilityDistribution, ClassifierError> {
        Err(ClassifierError::Runtime("model graph is corrupt".into()))
    }
}

/// Scores patients by age so concurrent callers get distinct answers.
pub struct AgeClassifier;

impl ClassifierPort for AgeClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<usize, ClassifierError> {
        Ok(usize::from(features.as_slice()[0] < 50.0))
    }

    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ProbabilityDistribution, ClassifierError> {
        let p = (100.0 - features.as_slice()[0]).clamp(0.0, 100.0) / 100.0;
        ProbabilityDistribution::new(vec![1.0 - p, p])
    }
}

pub fn encoders() -> EncoderTable {
    EncoderTable::new()
        .with_classes(CategoricalField::Sex, &["Female", "Male"])
        .with_classes(CategoricalField::CancerType, &["Breast Cancer", "Lung Cancer"])
        .with_classes(CategoricalField::Stage, &["I", "II", "III", "IV"])
        .with_classes(
            CategoricalField::Grade,
            &["Moderately Differentiated", "Poorly Differentiated"],
        )
        .with_classes(
            CategoricalField::Treatment,
            &["Surgery", "Surgery + Chemotherapy"],
        )
        .with_classes(CategoricalField::PerformanceStatus, &["Good", "Poor"])
}

pub fn scenario_json() -> Value {
    json!({
        "age": 58,
        "sex": "Female",
        "cancer_type": "Breast Cancer",
        "stage": "II",
        "grade": "Moderately Differentiated",
        "tumor_size_cm": 3.2,
        "treatment": "Surgery + Chemotherapy",
        "performance_status": "Good"
    })
}

pub fn scenario_record() -> PatientRecord {
    PatientRecord::from_value(scenario_json())
}

/// The scenario record with `key` removed.
pub fn record_without(key: &str) -> PatientRecord {
    let mut value = scenario_json();
    if let Value::Object(map) = &mut value {
        map.remove(key);
    }
    PatientRecord::from_value(value)
}

/// The scenario record with `key` replaced.
pub fn record_with(key: &str, replacement: Value) -> PatientRecord {
    let mut value = scenario_json();
    value[key] = replacement;
    PatientRecord::from_value(value)
}
