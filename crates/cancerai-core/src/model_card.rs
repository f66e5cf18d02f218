//! Static metadata reported alongside predictions.
//!
//! Figures come from the training run and are surfaced verbatim; nothing here
//! is computed at request time.

use serde::Serialize;

/// Descriptive metadata for one trained classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelCard {
    pub name: &'static str,
    pub accuracy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_validation: Option<&'static str>,
    /// One-line summary used by the health endpoint.
    #[serde(skip)]
    pub summary: &'static str,
}

pub const SURVIVAL_MODEL: ModelCard = ModelCard {
    name: "Gradient Boosting Classifier",
    accuracy: "85.0%",
    cross_validation: Some("85.5% (±4.9%)"),
    summary: "Gradient Boosting (85.0% accuracy)",
};

pub const DRUG_RESPONSE_MODEL: ModelCard = ModelCard {
    name: "Random Forest Classifier",
    accuracy: "85.0%",
    cross_validation: None,
    summary: "Random Forest (85.0% accuracy)",
};
