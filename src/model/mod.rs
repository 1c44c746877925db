pub mod artifact;
pub mod engine;

use crate::classification::ClassProbabilities;

pub use artifact::{DecisionTree, ModelArtifact, TreeNode};
pub use engine::{
    read_columns, LoadOutcome, LoadedModel, ModelInferenceEngine, ModelPrediction, ModelStatus,
};

/// Phishing probability must exceed this for a positive verdict. Set high on
/// purpose to keep false positives down.
pub const PHISHING_THRESHOLD: f64 = 0.70;

/// A trained two-class model operating on a vector already aligned to its
/// feature columns
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, features: &[f64]) -> anyhow::Result<ClassProbabilities>;
    fn n_features(&self) -> usize;
    fn kind(&self) -> &str;
}
