//! Core types for CancerAI: patient records, encoder tables, and the
//! feature-vector contract shared with the trained classifiers.

pub mod encoder;
pub mod error;
pub mod field;
pub mod model_card;
pub mod record;
pub mod reference;

pub use encoder::{
    Code, EncodedRecord, EncoderTable, FEATURE_COUNT, FeatureVector, encode, encode_detailed,
};
pub use error::{ArtifactError, EncodingError, ValidationError};
pub use field::{CategoricalField, FEATURE_ORDER, Field, REQUIRED_FIELDS};
pub use model_card::{DRUG_RESPONSE_MODEL, ModelCard, SURVIVAL_MODEL};
pub use record::PatientRecord;
