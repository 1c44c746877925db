pub mod domain_heuristics;
pub mod lexical_stats;
pub mod url_structure;

use crate::domain_utils::{DomainUtils, ParsedHost};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Fixed feature schema, in the order the trained column lists use
pub const FEATURE_NAMES: [&str; 35] = [
    "having_IP_Address",
    "URL_Length",
    "Shortening_Service",
    "having_At_Symbol",
    "double_slash_redirecting",
    "Prefix_Suffix",
    "having_Sub_Domain",
    "HTTPS_token",
    "having_port",
    "Abnormal_URL",
    "Redirect",
    "URL_of_Anchor",
    "Links_in_tags",
    "SFH",
    "popUpWindow",
    "Iframe",
    "Age_of_domain",
    "DNSRecord",
    "web_traffic",
    "Google_Index",
    "Links_pointing_to_page",
    "Statistical_report",
    "url_length",
    "entropy",
    "digit_count",
    "letter_count",
    "special_count",
    "digit_ratio",
    "letter_ratio",
    "special_ratio",
    "Request_URL",
    "Submitting_to_email",
    "Abnormal_Form_Action",
    "on_mouseover",
    "RightClick",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Page-content signals reserved for future analysis. Always emitted as 0.
pub const PLACEHOLDER_FEATURES: [&str; 13] = [
    "URL_of_Anchor",
    "Links_in_tags",
    "SFH",
    "popUpWindow",
    "Iframe",
    "web_traffic",
    "Links_pointing_to_page",
    "Statistical_report",
    "Request_URL",
    "Submitting_to_email",
    "Abnormal_Form_Action",
    "on_mouseover",
    "RightClick",
];

pub fn bool_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Per-call view of the URL shared by all feature groups
#[derive(Debug, Clone)]
pub struct UrlContext<'a> {
    pub url: &'a str,
    pub char_count: usize,
    pub host: Option<ParsedHost>,
}

impl<'a> UrlContext<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            char_count: url.chars().count(),
            host: DomainUtils::parse_host(url),
        }
    }

    /// Registrable domain, empty when the URL has no recoverable host
    pub fn domain(&self) -> &str {
        self.host
            .as_ref()
            .map(|host| host.registrable_domain.as_str())
            .unwrap_or("")
    }
}

/// Ordered feature map produced by [`UrlFeatureExtractor::extract`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    values: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    /// Value of a feature, 0 when absent
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    /// True when the feature is present and non-zero
    pub fn is_set(&self, name: &str) -> bool {
        self.value(name) != 0.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries with a non-zero value, in schema order
    pub fn non_zero(&self) -> FeatureVector {
        Self {
            values: self
                .values
                .iter()
                .filter(|(_, value)| *value != 0.0)
                .cloned()
                .collect(),
        }
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub trait FeatureGroup: Send + Sync {
    fn extract(&self, context: &UrlContext) -> Vec<(&'static str, f64)>;
    fn name(&self) -> &str;
}

struct ContentPlaceholders;

impl FeatureGroup for ContentPlaceholders {
    fn extract(&self, _context: &UrlContext) -> Vec<(&'static str, f64)> {
        PLACEHOLDER_FEATURES.iter().map(|name| (*name, 0.0)).collect()
    }

    fn name(&self) -> &str {
        "content_placeholders"
    }
}

pub struct UrlFeatureExtractor {
    groups: Vec<Box<dyn FeatureGroup>>,
}

impl Default for UrlFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlFeatureExtractor {
    pub fn new() -> Self {
        Self {
            groups: vec![
                Box::new(url_structure::UrlStructureAnalyzer::new()),
                Box::new(ContentPlaceholders),
                Box::new(domain_heuristics::DomainHeuristics),
                Box::new(lexical_stats::LexicalStatsAnalyzer),
            ],
        }
    }

    /// Compute the full feature schema for a URL. Any value a group cannot
    /// produce is left at 0; the key set never changes.
    pub fn extract(&self, url: &str) -> FeatureVector {
        let context = UrlContext::new(url);
        if context.host.is_none() {
            log::debug!("No host recovered from {:?}, domain features use defaults", url);
        }

        let mut computed: HashMap<&'static str, f64> = HashMap::with_capacity(FEATURE_COUNT);
        for group in &self.groups {
            for (name, value) in group.extract(&context) {
                let value = if value.is_finite() { value } else { 0.0 };
                computed.insert(name, value);
            }
            log::trace!("Feature group {} done for {}", group.name(), url);
        }

        FeatureVector::from_pairs(
            FEATURE_NAMES
                .iter()
                .map(|name| (*name, computed.get(name).copied().unwrap_or(0.0))),
        )
    }
}
