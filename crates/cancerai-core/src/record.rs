//! Loosely-typed patient records as they arrive over the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EncodingError, ValidationError};
use crate::field::{Field, REQUIRED_FIELDS};

/// A single patient record, kept as the raw JSON object it was submitted as.
///
/// Values are not coerced until [`encode`](crate::encode) runs, so the
/// original inputs can be echoed back unchanged in reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord {
    fields: Map<String, Value>,
}

impl PatientRecord {
    /// Wrap an arbitrary JSON value. Anything other than an object yields an
    /// empty record, which then fails validation on every field.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Raw value of a field. `null` counts as present.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.fields.get(field.as_str())
    }

    /// Raw value of a field, or [`EncodingError::Missing`].
    pub fn require(&self, field: Field) -> Result<&Value, EncodingError> {
        self.get(field).ok_or(EncodingError::Missing(field))
    }

    /// All required fields absent from this record, in declaration order.
    pub fn missing_fields(&self) -> Vec<Field> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|f| !self.fields.contains_key(f.as_str()))
            .collect()
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Clone a field's raw value for echoing, `null` if absent.
    pub fn echo(&self, field: Field) -> Value {
        self.get(field).cloned().unwrap_or(Value::Null)
    }
}
