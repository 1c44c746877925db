use crate::features::FeatureVector;

pub const NO_INDICATORS: &str = "No strong phishing indicators detected";

/// More subdomain labels than this are reported
const SUBDOMAIN_LIMIT: f64 = 2.0;

/// Builds the human-readable reason string for a verdict
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Indicators in fixed order that fired for this vector
    pub fn reasons(&self, features: &FeatureVector) -> Vec<&'static str> {
        let mut reasons = Vec::new();

        if features.is_set("having_IP_Address") {
            reasons.push("IP address in URL");
        }
        if features.is_set("Shortening_Service") {
            reasons.push("URL shortening service");
        }
        if features.is_set("having_At_Symbol") {
            reasons.push("@ symbol in URL");
        }
        if features.is_set("HTTPS_token") {
            reasons.push("suspicious HTTPS usage");
        }
        if features.is_set("Prefix_Suffix") {
            reasons.push("hyphen in domain");
        }
        if features.value("having_Sub_Domain") > SUBDOMAIN_LIMIT {
            reasons.push("multiple subdomains");
        }

        reasons
    }

    /// The verdict does not influence which indicators are listed; a
    /// legitimate result still names any indicator that fired.
    pub fn explain(&self, features: &FeatureVector, _is_phishing: bool) -> String {
        let reasons = self.reasons(features);
        if reasons.is_empty() {
            NO_INDICATORS.to_string()
        } else {
            format!("Detected features: {}", reasons.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_indicators() {
        let features = FeatureVector::from_pairs([("having_IP_Address", 0.0)]);
        assert_eq!(ExplanationGenerator::new().explain(&features, false), NO_INDICATORS);
    }

    #[test]
    fn test_reasons_in_fixed_order() {
        let features = FeatureVector::from_pairs([
            ("having_Sub_Domain", 3.0),
            ("Prefix_Suffix", 1.0),
            ("having_At_Symbol", 1.0),
            ("having_IP_Address", 1.0),
        ]);
        assert_eq!(
            ExplanationGenerator::new().explain(&features, true),
            "Detected features: IP address in URL, @ symbol in URL, hyphen in domain, multiple subdomains"
        );
    }

    #[test]
    fn test_verdict_does_not_change_reasons() {
        let generator = ExplanationGenerator::new();
        let features = FeatureVector::from_pairs([("Shortening_Service", 1.0)]);
        assert_eq!(
            generator.explain(&features, true),
            generator.explain(&features, false)
        );
    }

    #[test]
    fn test_two_subdomains_not_reported() {
        let features = FeatureVector::from_pairs([("having_Sub_Domain", 2.0)]);
        assert!(ExplanationGenerator::new().reasons(&features).is_empty());
    }
}
