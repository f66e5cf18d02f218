//! Startup artifact loading.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cancerai_ai::{ClassifierRole, OnnxClassifier, PredictionContext};
use cancerai_core::{CategoricalField, EncoderTable};

/// Encoder table file name inside the model directory.
pub const ENCODERS_FILE: &str = "label_encoders.json";

/// Load both classifiers and the encoder table from `model_dir`.
pub fn load_context(model_dir: &Path) -> anyhow::Result<PredictionContext> {
    tracing::info!(dir = %model_dir.display(), "loading models");

    let encoders = load_encoders(model_dir)?;
    let survival = OnnxClassifier::load(model_dir, ClassifierRole::Survival)
        .context("loading survival model")?;
    let drug_response = OnnxClassifier::load(model_dir, ClassifierRole::DrugResponse)
        .context("loading drug-response model")?;

    tracing::info!("models loaded");
    Ok(PredictionContext::new(
        encoders,
        Arc::new(survival),
        Arc::new(drug_response),
    ))
}

fn load_encoders(model_dir: &Path) -> anyhow::Result<EncoderTable> {
    let path = model_dir.join(ENCODERS_FILE);
    let table = EncoderTable::load(&path).with_context(|| format!("loading {}", path.display()))?;

    for field in CategoricalField::ALL {
        if !table.has_field(field) {
            tracing::warn!(
                %field,
                "encoder table has no entry; every value will use the fallback code"
            );
        }
    }
    Ok(table)
}
