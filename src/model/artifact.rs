use super::Classifier;
use crate::classification::ClassProbabilities;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted classifier, as written by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelArtifact {
    RandomForest {
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TreeNode {
    /// Samples with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class weights `[legitimate, phishing]`, normalized when read
    Leaf { value: [f64; 2] },
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            bail!("tree has no nodes");
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        bail!(
                            "node {} splits on feature {} but the model has {}",
                            index,
                            feature,
                            n_features
                        );
                    }
                    if !threshold.is_finite() {
                        bail!("node {} has a non-finite threshold", index);
                    }
                    if *left >= self.nodes.len() || *right >= self.nodes.len() {
                        bail!("node {} points outside the tree", index);
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        bail!("leaf {} has invalid class weights", index);
                    }
                    if value[0] + value[1] <= 0.0 {
                        bail!("leaf {} has zero total weight", index);
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root. The walk is bounded by the node count so a cycle
    /// ends in an error instead of looping.
    fn predict(&self, features: &[f64]) -> Result<[f64; 2]> {
        let mut index = 0;
        for _ in 0..=self.nodes.len() {
            match self
                .nodes
                .get(index)
                .ok_or_else(|| anyhow!("node {} out of range", index))?
            {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features
                        .get(*feature)
                        .ok_or_else(|| anyhow!("feature {} out of range", feature))?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return Ok([value[0] / total, value[1] / total]);
                }
            }
        }

        bail!("tree walk did not reach a leaf")
    }
}

impl ModelArtifact {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse model artifact: {}", path.display()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write model artifact: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::RandomForest { n_features, trees } => {
                if *n_features == 0 {
                    bail!("random forest declares zero features");
                }
                if trees.is_empty() {
                    bail!("random forest has no trees");
                }
                for (index, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features)
                        .with_context(|| format!("invalid tree {}", index))?;
                }
            }
            ModelArtifact::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.is_empty() {
                    bail!("logistic regression has no coefficients");
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    bail!("logistic regression has non-finite parameters");
                }
            }
        }
        Ok(())
    }

    fn phishing_probability(&self, features: &[f64]) -> Result<f64> {
        match self {
            ModelArtifact::RandomForest { trees, .. } => {
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.predict(features)?[1];
                }
                Ok(sum / trees.len() as f64)
            }
            ModelArtifact::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let z: f64 = coefficients
                    .iter()
                    .zip(features)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + intercept;
                Ok(1.0 / (1.0 + (-z).exp()))
            }
        }
    }
}

impl Classifier for ModelArtifact {
    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities> {
        if features.len() != self.n_features() {
            bail!(
                "shape mismatch: model expects {} features, got {}",
                self.n_features(),
                features.len()
            );
        }

        let phishing = self.phishing_probability(features)?;
        if !phishing.is_finite() || !(0.0..=1.0).contains(&phishing) {
            bail!("model produced an invalid probability: {}", phishing);
        }

        Ok(ClassProbabilities {
            legitimate: 1.0 - phishing,
            phishing,
        })
    }

    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::RandomForest { n_features, .. } => *n_features,
            ModelArtifact::LogisticRegression { coefficients, .. } => coefficients.len(),
        }
    }

    fn kind(&self) -> &str {
        match self {
            ModelArtifact::RandomForest { .. } => "RandomForest",
            ModelArtifact::LogisticRegression { .. } => "LogisticRegression",
        }
    }
}
