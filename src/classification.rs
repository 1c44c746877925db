use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "model")]
    Model,
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Model => write!(f, "model"),
            Method::RuleBased => write!(f, "rule-based"),
        }
    }
}

/// Two-class probability distribution returned by a classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub legitimate: f64,
    pub phishing: f64,
}

/// Verdict for one feature vector.
///
/// On the rule-based path `confidence` is the probability of the declared
/// class. On the model path it is always the phishing probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_phishing: bool,
    pub confidence: f64,
    pub method: Method,
    pub missing_features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_wire_names() {
        assert_eq!(serde_json::to_string(&Method::Model).unwrap(), "\"model\"");
        assert_eq!(
            serde_json::to_string(&Method::RuleBased).unwrap(),
            "\"rule-based\""
        );
        assert_eq!(Method::RuleBased.to_string(), "rule-based");
    }
}
