use super::{Classifier, ModelArtifact, PHISHING_THRESHOLD};
use crate::classification::{ClassProbabilities, ClassificationResult, Method};
use crate::features::FeatureVector;
use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Read the ordered feature column list written next to the model
pub fn read_columns(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature columns: {}", path.display()))?;
    let columns: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse feature columns: {}", path.display()))?;
    Ok(columns)
}

/// Immutable classifier snapshot: the model and the columns it was trained on
pub struct LoadedModel {
    classifier: Box<dyn Classifier>,
    columns: Vec<String>,
    source: String,
}

impl LoadedModel {
    pub fn new(
        classifier: Box<dyn Classifier>,
        columns: Vec<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        if columns.is_empty() {
            bail!("feature column list is empty");
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                bail!("duplicate feature column: {}", column);
            }
        }

        if classifier.n_features() != columns.len() {
            bail!(
                "model expects {} features but the column list has {}",
                classifier.n_features(),
                columns.len()
            );
        }

        Ok(Self {
            classifier,
            columns,
            source: source.into(),
        })
    }

    pub fn from_files(model_path: &Path, columns_path: &Path) -> Result<Self> {
        let artifact = ModelArtifact::from_file(model_path)?;
        let columns = read_columns(columns_path)?;
        Self::new(
            Box::new(artifact),
            columns,
            model_path.display().to_string(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &str {
        self.classifier.kind()
    }

    /// Values in column order, with 0 for every column the vector lacks.
    /// Returns the aligned values and the names of the missing columns.
    pub fn align(&self, features: &FeatureVector) -> (Vec<f64>, Vec<String>) {
        let mut aligned = Vec::with_capacity(self.columns.len());
        let mut missing = Vec::new();

        for column in &self.columns {
            match features.get(column) {
                Some(value) => aligned.push(value),
                None => {
                    missing.push(column.clone());
                    aligned.push(0.0);
                }
            }
        }

        (aligned, missing)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<ModelPrediction> {
        let (aligned, missing_features) = self.align(features);
        if !missing_features.is_empty() {
            log::warn!(
                "Missing {} features, using default value 0: {:?}",
                missing_features.len(),
                missing_features
            );
        }

        let probabilities = self.classifier.predict_proba(&aligned)?;
        let is_phishing = probabilities.phishing > PHISHING_THRESHOLD;

        Ok(ModelPrediction {
            is_phishing,
            confidence: probabilities.phishing,
            threshold_used: PHISHING_THRESHOLD,
            probabilities,
            missing_features,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub is_phishing: bool,
    /// Phishing-class probability, regardless of the verdict
    pub confidence: f64,
    pub threshold_used: f64,
    pub probabilities: ClassProbabilities,
    pub missing_features: Vec<String>,
}

impl From<ModelPrediction> for ClassificationResult {
    fn from(prediction: ModelPrediction) -> Self {
        ClassificationResult {
            is_phishing: prediction.is_phishing,
            confidence: prediction.confidence,
            method: Method::Model,
            missing_features: prediction.missing_features,
            probabilities: Some(prediction.probabilities),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub success: bool,
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub model_path: Option<String>,
    pub model_kind: Option<String>,
    pub feature_columns: Option<Vec<String>>,
    pub total_features: usize,
    pub last_load_error: Option<String>,
}

/// Holds the current classifier snapshot.
///
/// A failed load never replaces a snapshot that loaded successfully before:
/// the engine keeps serving the last good model and reports the failure via
/// the return value and [`ModelInferenceEngine::last_load_error`].
#[derive(Default)]
pub struct ModelInferenceEngine {
    state: RwLock<EngineState>,
}

/// Snapshot and load error change together under one lock
#[derive(Default)]
struct EngineState {
    model: Option<Arc<LoadedModel>>,
    last_load_error: Option<String>,
}

impl ModelInferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, model_path: impl AsRef<Path>, columns_path: impl AsRef<Path>) -> bool {
        let model_path = model_path.as_ref();
        let columns_path = columns_path.as_ref();

        match LoadedModel::from_files(model_path, columns_path) {
            Ok(model) => {
                log::info!(
                    "Model loaded from {} ({}, {} features)",
                    model_path.display(),
                    model.kind(),
                    model.columns().len()
                );
                log::debug!("Feature columns: {:?}", model.columns());
                self.install(model);
                true
            }
            Err(e) => {
                let message = format!("{:#}", e);
                let mut state = self.state.write();
                if state.model.is_some() {
                    log::error!(
                        "Error loading model, keeping previously loaded model: {}",
                        message
                    );
                } else {
                    log::error!("Error loading model: {}", message);
                }
                state.last_load_error = Some(message);
                false
            }
        }
    }

    pub fn load_model(
        &self,
        model_path: impl AsRef<Path>,
        columns_path: impl AsRef<Path>,
    ) -> LoadOutcome {
        if self.load(model_path, columns_path) {
            LoadOutcome {
                success: true,
                features: self.columns(),
            }
        } else {
            LoadOutcome {
                success: false,
                features: None,
            }
        }
    }

    /// Publish a new snapshot. Readers see either the old or the new one.
    pub fn install(&self, model: LoadedModel) {
        let model = Arc::new(model);
        let mut state = self.state.write();
        state.model = Some(model);
        state.last_load_error = None;
    }

    pub fn snapshot(&self) -> Option<Arc<LoadedModel>> {
        self.state.read().model.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    pub fn columns(&self) -> Option<Vec<String>> {
        self.snapshot().map(|model| model.columns().to_vec())
    }

    pub fn last_load_error(&self) -> Option<String> {
        self.state.read().last_load_error.clone()
    }

    pub fn status(&self) -> ModelStatus {
        let (snapshot, last_load_error) = {
            let state = self.state.read();
            (state.model.clone(), state.last_load_error.clone())
        };
        ModelStatus {
            model_loaded: snapshot.is_some(),
            model_path: snapshot.as_ref().map(|m| m.source().to_string()),
            model_kind: snapshot.as_ref().map(|m| m.kind().to_string()),
            feature_columns: snapshot.as_ref().map(|m| m.columns().to_vec()),
            total_features: snapshot.as_ref().map_or(0, |m| m.columns().len()),
            last_load_error,
        }
    }

    /// `None` when no model is loaded or the model failed on this input;
    /// callers fall back to rule-based scoring.
    pub fn predict(&self, features: &FeatureVector) -> Option<ModelPrediction> {
        let model = self.snapshot()?;
        match model.predict(features) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                log::error!("Prediction error: {:#}", e);
                None
            }
        }
    }
}
