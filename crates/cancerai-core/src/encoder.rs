//! Categorical encoder tables and feature-vector encoding.
//!
//! An [`EncoderTable`] is produced by the training pipeline and loaded once at
//! startup. [`encode`] turns a [`PatientRecord`] into the 8-value
//! [`FeatureVector`] both classifiers expect.
//!
//! Unseen categories do not fail the request: they resolve to
//! [`Code::FALLBACK`] and a warning is logged. Code 0 is also the code of the
//! first trained category of every field, so the two are indistinguishable to
//! the model.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ArtifactError, EncodingError};
use crate::field::{CategoricalField, FEATURE_ORDER, Field};
use crate::record::PatientRecord;

/// Number of columns in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = FEATURE_ORDER.len();

/// Result of looking a category up in the encoder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Known(u32),
    /// Field or value not in the table.
    Unknown,
}

impl Code {
    /// Code substituted for [`Code::Unknown`].
    pub const FALLBACK: u32 = 0;

    pub fn value(self) -> u32 {
        match self {
            Self::Known(code) => code,
            Self::Unknown => Self::FALLBACK,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Immutable category → code mapping for each categorical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderTable {
    fields: HashMap<CategoricalField, HashMap<String, u32>>,
}

/// On-disk shape of one field's table: either the ordered class list of a
/// fitted label encoder, or an explicit `{category: code}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Classes(Vec<String>),
    Codes(HashMap<String, u32>),
}

impl EncoderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: assign codes `0..n` to `classes` in order.
    pub fn with_classes<S: AsRef<str>>(mut self, field: CategoricalField, classes: &[S]) -> Self {
        self.fields.insert(field, classes_to_codes(classes));
        self
    }

    /// Parse a JSON encoder table. Keys that are not categorical field names
    /// are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let raw: HashMap<String, RawColumn> = serde_json::from_str(json)?;
        let mut fields = HashMap::with_capacity(raw.len());

        for (name, column) in raw {
            let Some(field) = CategoricalField::from_name(&name) else {
                warn!(field = %name, "ignoring encoder table entry for unknown field");
                continue;
            };
            let codes = match column {
                RawColumn::Classes(classes) => classes_to_codes(&classes),
                RawColumn::Codes(codes) => {
                    check_unique_codes(&name, &codes)?;
                    codes
                }
            };
            fields.insert(field, codes);
        }

        Ok(Self { fields })
    }

    /// Load a JSON encoder table from disk.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            fields = table.fields.len(),
            "loaded encoder table"
        );
        Ok(table)
    }

    /// Look up a category. Matching is exact and case-sensitive; values that
    /// are not JSON strings never match.
    pub fn lookup(&self, field: CategoricalField, value: &Value) -> Code {
        let Value::String(category) = value else {
            return Code::Unknown;
        };
        self.lookup_str(field, category)
    }

    pub fn lookup_str(&self, field: CategoricalField, category: &str) -> Code {
        self.fields
            .get(&field)
            .and_then(|codes| codes.get(category))
            .map_or(Code::Unknown, |&code| Code::Known(code))
    }

    /// Whether the table has an entry for `field` at all.
    pub fn has_field(&self, field: CategoricalField) -> bool {
        self.fields.contains_key(&field)
    }
}

fn classes_to_codes<S: AsRef<str>>(classes: &[S]) -> HashMap<String, u32> {
    let mut codes = HashMap::with_capacity(classes.len());
    for (i, class) in classes.iter().enumerate() {
        codes.entry(class.as_ref().to_string()).or_insert(i as u32);
    }
    codes
}

fn check_unique_codes(field: &str, codes: &HashMap<String, u32>) -> Result<(), ArtifactError> {
    let mut seen: HashMap<u32, &str> = HashMap::with_capacity(codes.len());
    for (category, &code) in codes {
        if let Some(first) = seen.insert(code, category) {
            let (first, second) = if first < category.as_str() {
                (first, category.as_str())
            } else {
                (category.as_str(), first)
            };
            return Err(ArtifactError::DuplicateCode {
                field: field.to_string(),
                code,
                first: first.to_string(),
                second: second.to_string(),
            });
        }
    }
    Ok(())
}

/// Fixed-order numeric encoding of a patient record. See [`FEATURE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of the column holding `field`.
    pub fn get(&self, field: Field) -> f64 {
        let idx = FEATURE_ORDER
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        self.0[idx]
    }

    /// Single-precision copy for model runtimes that take `f32` input.
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.0.map(|v| v as f32)
    }
}

/// A feature vector plus the categorical fields that fell back to
/// [`Code::FALLBACK`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub features: FeatureVector,
    pub fallbacks: Vec<CategoricalField>,
}

/// Encode a record into the feature vector the classifiers were trained on.
pub fn encode(
    record: &PatientRecord,
    table: &EncoderTable,
) -> Result<FeatureVector, EncodingError> {
    encode_detailed(record, table).map(|encoded| encoded.features)
}

/// [`encode`], also reporting which categorical fields were unknown.
pub fn encode_detailed(
    record: &PatientRecord,
    table: &EncoderTable,
) -> Result<EncodedRecord, EncodingError> {
    let mut values = [0.0f64; FEATURE_COUNT];
    let mut fallbacks = Vec::new();

    for (slot, field) in values.iter_mut().zip(FEATURE_ORDER) {
        match field.categorical() {
            None => *slot = parse_numeric(field, record.require(field)?)?,
            Some(cat) => {
                // An absent categorical field is treated like an unseen value.
                let code = record
                    .get(field)
                    .map_or(Code::Unknown, |value| table.lookup(cat, value));
                if !code.is_known() {
                    warn!(
                        field = %cat,
                        value = %record.echo(field),
                        in_table = table.has_field(cat),
                        fallback = Code::FALLBACK,
                        "unknown category, using fallback code"
                    );
                    fallbacks.push(cat);
                }
                *slot = f64::from(code.value());
            }
        }
    }

    Ok(EncodedRecord {
        features: FeatureVector(values),
        fallbacks,
    })
}

/// Accept JSON numbers and numeric strings.
fn parse_numeric(field: Field, value: &Value) -> Result<f64, EncodingError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(EncodingError::NotNumeric {
            field,
            value: value.to_string(),
        }),
    }
}
