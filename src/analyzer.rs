use crate::classification::ClassificationResult;
use crate::domain_utils::DomainUtils;
use crate::explain::ExplanationGenerator;
use crate::fallback::RuleBasedClassifier;
use crate::features::{FeatureVector, UrlFeatureExtractor};
use crate::model::ModelInferenceEngine;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Full record returned for one analyzed URL
#[derive(Debug, Clone, Serialize)]
pub struct UrlReport {
    pub url: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub explanation: String,
    pub analyzed_at: u64,
    pub features_analyzed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFailure {
    pub error: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Report(UrlReport),
    Failed(AnalysisFailure),
}

impl AnalysisResponse {
    pub fn report(&self) -> Option<&UrlReport> {
        match self {
            AnalysisResponse::Report(report) => Some(report),
            AnalysisResponse::Failed(_) => None,
        }
    }
}

/// Runs extraction, model-or-rules classification and explanation for a URL
pub struct PhishingAnalyzer {
    extractor: UrlFeatureExtractor,
    engine: Arc<ModelInferenceEngine>,
    rules: RuleBasedClassifier,
    explainer: ExplanationGenerator,
}

impl PhishingAnalyzer {
    pub fn new(engine: Arc<ModelInferenceEngine>) -> Self {
        Self {
            extractor: UrlFeatureExtractor::new(),
            engine,
            rules: RuleBasedClassifier::new(),
            explainer: ExplanationGenerator::new(),
        }
    }

    pub fn engine(&self) -> &Arc<ModelInferenceEngine> {
        &self.engine
    }

    /// Feature map for a URL exactly as given, without scheme normalization
    pub fn extract_features(&self, url: &str) -> FeatureVector {
        self.extractor.extract(url)
    }

    /// Model prediction when available, rule-based scoring otherwise
    pub fn decide(&self, features: &FeatureVector) -> ClassificationResult {
        if !self.engine.is_loaded() {
            return self.rules.classify(features);
        }

        match self.engine.predict(features) {
            Some(prediction) => prediction.into(),
            None => {
                log::warn!("Model prediction unavailable, falling back to rule-based analysis");
                self.rules.classify(features)
            }
        }
    }

    pub fn classify(&self, url: &str) -> AnalysisResponse {
        let url = DomainUtils::normalize_url(url);

        let extracted = panic::catch_unwind(AssertUnwindSafe(|| self.extractor.extract(&url)));
        let features = match extracted {
            Ok(features) => features,
            Err(payload) => {
                let error = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "feature extraction failed".to_string());
                log::error!("Feature extraction failed for {}: {}", url, error);
                return AnalysisResponse::Failed(AnalysisFailure { error, url });
            }
        };

        let result = self.decide(&features);
        let explanation = self.explainer.explain(&features, result.is_phishing);
        let warning = if result.missing_features.is_empty() {
            None
        } else {
            Some(format!(
                "{} features unavailable",
                result.missing_features.len()
            ))
        };

        log::debug!(
            "{} -> phishing={} confidence={:.3} method={}",
            url,
            result.is_phishing,
            result.confidence,
            result.method
        );

        AnalysisResponse::Report(UrlReport {
            url,
            result,
            explanation,
            analyzed_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            features_analyzed: features.len(),
            warning,
        })
    }
}
