pub mod analyzer;
pub mod classification;
pub mod config;
pub mod domain_utils;
pub mod explain;
pub mod fallback;
pub mod features;
pub mod model;

pub use analyzer::{AnalysisFailure, AnalysisResponse, PhishingAnalyzer, UrlReport};
pub use classification::{ClassProbabilities, ClassificationResult, Method};
pub use config::Config;
pub use features::{FeatureVector, UrlFeatureExtractor};
pub use model::{LoadOutcome, ModelInferenceEngine};
