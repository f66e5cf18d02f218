//! ONNX Runtime backend for tree-ensemble classifiers.
//!
//! Expects a graph exported from a fitted classifier with probability maps
//! disabled: one float input of shape `[N, 8]`, output 0 holding int64
//! labels `[N]` and output 1 holding float probabilities `[N, C]`.

use std::path::Path;
use std::sync::Mutex;

use cancerai_core::{FEATURE_COUNT, FeatureVector};
use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::classifier::{
    ClassificationResult, ClassifierError, ClassifierPort, ClassifierRole,
    ProbabilityDistribution,
};

/// A classifier backed by an ONNX Runtime session.
///
/// `Session::run` needs exclusive access, so each call holds the session lock
/// for the duration of that one run only.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxClassifier {
    /// Load the artifact for `role` from `model_dir`.
    pub fn load(model_dir: &Path, role: ClassifierRole) -> anyhow::Result<Self> {
        Self::load_file(&model_dir.join(role.artifact_name()), role)
    }

    pub fn load_file(model_path: &Path, role: ClassifierRole) -> anyhow::Result<Self> {
        anyhow::ensure!(model_path.exists(), "model not found: {model_path:?}");

        let session = Session::builder()?.commit_from_file(model_path)?;

        anyhow::ensure!(
            !session.inputs().is_empty(),
            "{model_path:?} declares no inputs"
        );
        anyhow::ensure!(
            session.outputs().len() >= 2,
            "{model_path:?} must output labels and probabilities, found {} outputs",
            session.outputs().len()
        );
        let input_name = session.inputs()[0].name().to_string();

        info!(
            role = role.as_str(),
            model = %model_path.display(),
            input = %input_name,
            "loaded classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run the graph once, returning the label and raw probabilities.
    fn run(&self, features: &FeatureVector) -> Result<(i64, Vec<f64>), ClassifierError> {
        let shape = [1i64, FEATURE_COUNT as i64];
        let input = Tensor::from_array((shape, features.to_f32().to_vec().into_boxed_slice()))
            .map_err(runtime)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Runtime("classifier session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(runtime)?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>().map_err(runtime)?;
        let label = *labels
            .first()
            .ok_or_else(|| ClassifierError::Runtime("model returned no label".into()))?;

        let (prob_shape, probs) = outputs[1].try_extract_tensor::<f32>().map_err(runtime)?;
        let dims: &[i64] = prob_shape;
        if dims.len() != 2 || dims[0] != 1 {
            return Err(ClassifierError::Runtime(format!(
                "unexpected probability shape {dims:?}, expected [1, C]"
            )));
        }
        let probs = probs.iter().map(|&p| f64::from(p)).collect();

        Ok((label, probs))
    }
}

fn runtime(e: ort::Error) -> ClassifierError {
    ClassifierError::Runtime(e.to_string())
}

fn to_class(label: i64) -> Result<usize, ClassifierError> {
    usize::try_from(label)
        .map_err(|_| ClassifierError::Runtime(format!("model returned negative label {label}")))
}

impl ClassifierPort for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<usize, ClassifierError> {
        let (label, _) = self.run(features)?;
        to_class(label)
    }

    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ProbabilityDistribution, ClassifierError> {
        let (_, probs) = self.run(features)?;
        ProbabilityDistribution::new(probs)
    }

    fn classify(&self, features: &FeatureVector) -> Result<ClassificationResult, ClassifierError> {
        let (label, probs) = self.run(features)?;
        ClassificationResult::new(to_class(label)?, ProbabilityDistribution::new(probs)?)
    }
}
