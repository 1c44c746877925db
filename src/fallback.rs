use crate::classification::{ClassificationResult, Method};
use crate::features::FeatureVector;

/// Indicator weights for the rule-based score
pub const RULE_WEIGHTS: [(&str, f64); 5] = [
    ("having_IP_Address", 0.30),
    ("Shortening_Service", 0.25),
    ("having_At_Symbol", 0.20),
    ("double_slash_redirecting", 0.10),
    ("HTTPS_token", 0.15),
];

/// Score must exceed this to be reported as phishing
pub const RULE_THRESHOLD: f64 = 0.5;

/// Weighted-sum heuristic used whenever no model prediction is available
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn risk_score(&self, features: &FeatureVector) -> f64 {
        RULE_WEIGHTS
            .iter()
            .filter(|(name, _)| features.is_set(name))
            .map(|(_, weight)| weight)
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    /// `confidence` is the probability of the declared class
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let score = self.risk_score(features);
        let is_phishing = score > RULE_THRESHOLD;
        let confidence = if is_phishing { score } else { 1.0 - score };

        log::debug!(
            "Rule-based score {:.2} -> phishing={} confidence={:.2}",
            score,
            is_phishing,
            confidence
        );

        ClassificationResult {
            is_phishing,
            confidence,
            method: Method::RuleBased,
            missing_features: Vec::new(),
            probabilities: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(set: &[&str]) -> FeatureVector {
        FeatureVector::from_pairs(
            RULE_WEIGHTS
                .iter()
                .map(|(name, _)| (*name, if set.contains(name) { 1.0 } else { 0.0 })),
        )
    }

    #[test]
    fn test_no_indicators_is_confident_legitimate() {
        let result = RuleBasedClassifier::new().classify(&vector(&[]));
        assert!(!result.is_phishing);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.method, Method::RuleBased);
        assert!(result.probabilities.is_none());
    }

    #[test]
    fn test_ip_only() {
        let result = RuleBasedClassifier::new().classify(&vector(&["having_IP_Address"]));
        assert!(!result.is_phishing);
        assert!((result.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_score_is_not_phishing() {
        let classifier = RuleBasedClassifier::new();
        let features = vector(&["having_IP_Address", "having_At_Symbol"]);
        assert_eq!(classifier.risk_score(&features), 0.5);

        let result = classifier.classify(&features);
        assert!(!result.is_phishing);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_above_threshold() {
        let result = RuleBasedClassifier::new().classify(&vector(&[
            "having_IP_Address",
            "Shortening_Service",
        ]));
        assert!(result.is_phishing);
        assert!((result.confidence - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_clipped() {
        let all: Vec<&str> = RULE_WEIGHTS.iter().map(|(name, _)| *name).collect();
        let result = RuleBasedClassifier::new().classify(&vector(&all));
        assert!(result.is_phishing);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn test_absent_features_count_as_unset() {
        let result = RuleBasedClassifier::new().classify(&FeatureVector::default());
        assert!(!result.is_phishing);
        assert_eq!(result.confidence, 1.0);
    }
}
