//! Patient record field names and the feature ordering contract.
//!
//! The classifiers were trained on an 8-column matrix laid out as
//! [`FEATURE_ORDER`]. Changing that order without retraining produces
//! well-formed but meaningless predictions.

use std::fmt;

/// One of the eight fields a patient record must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Age,
    Sex,
    CancerType,
    Stage,
    Grade,
    TumorSizeCm,
    Treatment,
    PerformanceStatus,
}

/// Required fields in the order they are reported when missing.
pub const REQUIRED_FIELDS: [Field; 8] = [
    Field::Age,
    Field::Sex,
    Field::CancerType,
    Field::Stage,
    Field::Grade,
    Field::TumorSizeCm,
    Field::Treatment,
    Field::PerformanceStatus,
];

/// Column order of the feature vector consumed by both classifiers.
pub const FEATURE_ORDER: [Field; 8] = [
    Field::Age,
    Field::TumorSizeCm,
    Field::Sex,
    Field::CancerType,
    Field::Stage,
    Field::Grade,
    Field::Treatment,
    Field::PerformanceStatus,
];

impl Field {
    /// JSON key of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::CancerType => "cancer_type",
            Self::Stage => "stage",
            Self::Grade => "grade",
            Self::TumorSizeCm => "tumor_size_cm",
            Self::Treatment => "treatment",
            Self::PerformanceStatus => "performance_status",
        }
    }

    /// The categorical view of this field, or `None` for `age` / `tumor_size_cm`.
    pub fn categorical(&self) -> Option<CategoricalField> {
        match self {
            Self::Age | Self::TumorSizeCm => None,
            Self::Sex => Some(CategoricalField::Sex),
            Self::CancerType => Some(CategoricalField::CancerType),
            Self::Stage => Some(CategoricalField::Stage),
            Self::Grade => Some(CategoricalField::Grade),
            Self::Treatment => Some(CategoricalField::Treatment),
            Self::PerformanceStatus => Some(CategoricalField::PerformanceStatus),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A field whose value is looked up in the encoder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoricalField {
    Sex,
    CancerType,
    Stage,
    Grade,
    Treatment,
    PerformanceStatus,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        Self::Sex,
        Self::CancerType,
        Self::Stage,
        Self::Grade,
        Self::Treatment,
        Self::PerformanceStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        Field::from(*self).as_str()
    }

    /// Parse an encoder-table key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl From<CategoricalField> for Field {
    fn from(f: CategoricalField) -> Self {
        match f {
            CategoricalField::Sex => Field::Sex,
            CategoricalField::CancerType => Field::CancerType,
            CategoricalField::Stage => Field::Stage,
            CategoricalField::Grade => Field::Grade,
            CategoricalField::Treatment => Field::Treatment,
            CategoricalField::PerformanceStatus => Field::PerformanceStatus,
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
