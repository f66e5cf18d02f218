//! The classifier port: what a prediction service needs from a trained model.
//!
//! Implementations must be safe to call from many requests at once without
//! external locking. Nothing an inference call does may be visible to another
//! call.

use cancerai_core::{DRUG_RESPONSE_MODEL, FeatureVector, ModelCard, SURVIVAL_MODEL};
use thiserror::Error;

/// Allowed deviation of a distribution's sum from 1.0. Wide enough for
/// single-precision model outputs.
pub const PROBABILITY_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("classifier returned no probabilities")]
    EmptyDistribution,

    #[error("probability {value} at class {index} is outside [0, 1]")]
    ProbabilityOutOfRange { index: usize, value: f64 },

    #[error("probabilities sum to {sum}, expected 1")]
    NotNormalized { sum: f64 },

    #[error("predicted class {class} is outside the {classes}-class distribution")]
    UnknownClass { class: usize, classes: usize },

    #[error("model reports {actual} classes, at least {expected} required")]
    TooFewClasses { expected: usize, actual: usize },

    #[error("{0}")]
    Runtime(String),
}

/// Per-class probabilities for one input, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityDistribution(Vec<f64>);

impl ProbabilityDistribution {
    /// Values within [`PROBABILITY_TOLERANCE`] of 0 or 1 are clamped onto the
    /// bound before the range check.
    pub fn new(mut probabilities: Vec<f64>) -> Result<Self, ClassifierError> {
        if probabilities.is_empty() {
            return Err(ClassifierError::EmptyDistribution);
        }
        for (index, value) in probabilities.iter_mut().enumerate() {
            if (-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&*value) {
                *value = value.clamp(0.0, 1.0);
            } else {
                return Err(ClassifierError::ProbabilityOutOfRange {
                    index,
                    value: *value,
                });
            }
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ClassifierError::NotNormalized { sum });
        }
        Ok(Self(probabilities))
    }

    /// Probability of `class`, if the model has that many classes.
    pub fn get(&self, class: usize) -> Option<f64> {
        self.0.get(class).copied()
    }

    /// Probability of `class`, or [`ClassifierError::TooFewClasses`].
    pub fn require(&self, class: usize) -> Result<f64, ClassifierError> {
        self.get(class).ok_or(ClassifierError::TooFewClasses {
            expected: class + 1,
            actual: self.0.len(),
        })
    }

    /// Largest class probability.
    pub fn confidence(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Output of one inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub predicted_class: usize,
    pub probabilities: ProbabilityDistribution,
}

impl ClassificationResult {
    pub fn new(
        predicted_class: usize,
        probabilities: ProbabilityDistribution,
    ) -> Result<Self, ClassifierError> {
        if predicted_class >= probabilities.len() {
            return Err(ClassifierError::UnknownClass {
                class: predicted_class,
                classes: probabilities.len(),
            });
        }
        Ok(Self {
            predicted_class,
            probabilities,
        })
    }
}

/// A trained classifier over [`FeatureVector`]s.
pub trait ClassifierPort: Send + Sync {
    /// Predicted class label.
    fn predict(&self, features: &FeatureVector) -> Result<usize, ClassifierError>;

    /// Probability of every class.
    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ProbabilityDistribution, ClassifierError>;

    /// Label and probabilities together. Backends that produce both from a
    /// single run should override this.
    fn classify(&self, features: &FeatureVector) -> Result<ClassificationResult, ClassifierError> {
        let predicted_class = self.predict(features)?;
        let probabilities = self.predict_proba(features)?;
        ClassificationResult::new(predicted_class, probabilities)
    }
}

/// Which trained model a classifier stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierRole {
    /// Classes: 0 = did not survive, 1 = survived.
    Survival,
    /// Index 1 holds the probability of a positive response.
    DrugResponse,
}

impl ClassifierRole {
    /// Class index the service reads its headline probability from.
    pub const POSITIVE_CLASS: usize = 1;

    pub fn card(&self) -> &'static ModelCard {
        match self {
            Self::Survival => &SURVIVAL_MODEL,
            Self::DrugResponse => &DRUG_RESPONSE_MODEL,
        }
    }

    /// File name of the model artifact inside the model directory.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Self::Survival => "survival_prediction_model.onnx",
            Self::DrugResponse => "drug_response_model.onnx",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Survival => "survival",
            Self::DrugResponse => "drug_response",
        }
    }
}
