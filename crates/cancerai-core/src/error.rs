use thiserror::Error;

use crate::field::Field;

/// One or more required fields are absent from a patient record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", join(.missing))]
pub struct ValidationError {
    /// Every missing field, in [`REQUIRED_FIELDS`](crate::REQUIRED_FIELDS) order.
    pub missing: Vec<Field>,
}

fn join(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("field '{0}' is missing")]
    Missing(Field),

    #[error("could not convert {field} value {value} to float")]
    NotNumeric { field: Field, value: String },
}

/// Failure to read one of the startup artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid encoder table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoder table for '{field}' assigns code {code} to both '{first}' and '{second}'")]
    DuplicateCode {
        field: String,
        code: u32,
        first: String,
        second: String,
    },
}
