//! Inference serving: the classifier port, an ONNX Runtime backend, and the
//! survival / drug-response prediction services built on top of them.

pub mod classifier;
pub mod context;
pub mod drug_response;
pub mod error;
pub mod survival;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

#[cfg(test)]
mod test_support;

pub use classifier::{
    ClassificationResult, ClassifierError, ClassifierPort, ClassifierRole,
    ProbabilityDistribution,
};
pub use context::PredictionContext;
pub use drug_response::{DrugResponsePredictionService, DrugResponseReport, ResponseType};
pub use error::{ErrorKind, PredictionError};
pub use survival::{RiskCategory, SurvivalPredictionService, SurvivalReport};
