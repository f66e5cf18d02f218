use cancerai_core::{EncodingError, Field, ValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::classifier::ClassifierError;

/// Failure class of a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Encoding,
    Inference,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Encoding => "encoding",
            Self::Inference => "inference",
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("inference failed: {0}")]
    Inference(#[from] ClassifierError),
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Inference(_) => ErrorKind::Inference,
        }
    }

    /// Missing fields for a validation failure, empty otherwise.
    pub fn missing_fields(&self) -> &[Field] {
        match self {
            Self::Validation(e) => &e.missing,
            _ => &[],
        }
    }
}
