//! Domain reputation signals derived from static lookup tables.
//!
//! Static heuristic, not authoritative: no DNS, WHOIS or search-engine query is
//! made. The tables stand in for live data until real lookups exist, and the
//! values only approximate what the trained model saw during training.

use super::{bool_value, FeatureGroup, UrlContext};

/// Domains treated as long established, with a fixed age estimate
pub const WELL_KNOWN_AGED_DOMAINS: [&str; 4] =
    ["google.com", "facebook.com", "amazon.com", "microsoft.com"];

/// Domains assumed to resolve (stand-in for a DNS lookup)
pub const DNS_KNOWN_DOMAINS: [&str; 8] = [
    "google.com",
    "facebook.com",
    "youtube.com",
    "amazon.com",
    "microsoft.com",
    "apple.com",
    "wikipedia.org",
    "twitter.com",
];

/// Domains assumed to be indexed by search engines
pub const INDEXED_DOMAINS: [&str; 11] = [
    "google.com",
    "facebook.com",
    "youtube.com",
    "amazon.com",
    "microsoft.com",
    "apple.com",
    "wikipedia.org",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "nero.com",
];

const ESTABLISHED_AGE_DAYS: u32 = 3650;

/// Estimated domain age in days. Well-known domains get a fixed high value,
/// anything else is bucketed by length (short names are assumed newer).
pub fn estimate_domain_age(domain: &str) -> u32 {
    if WELL_KNOWN_AGED_DOMAINS.contains(&domain) {
        return ESTABLISHED_AGE_DAYS;
    }

    match domain.chars().count() {
        0..=7 => 30,
        8..=11 => 180,
        _ => 365,
    }
}

pub fn has_dns_record(domain: &str) -> bool {
    DNS_KNOWN_DOMAINS.contains(&domain)
}

pub fn is_search_indexed(domain: &str) -> bool {
    INDEXED_DOMAINS.contains(&domain)
}

pub struct DomainHeuristics;

impl FeatureGroup for DomainHeuristics {
    fn extract(&self, context: &UrlContext) -> Vec<(&'static str, f64)> {
        let domain = context.domain();
        vec![
            ("Age_of_domain", f64::from(estimate_domain_age(domain))),
            ("DNSRecord", bool_value(has_dns_record(domain))),
            ("Google_Index", bool_value(is_search_indexed(domain))),
        ]
    }

    fn name(&self) -> &str {
        "domain_heuristics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_domain_age() {
        assert_eq!(estimate_domain_age("google.com"), 3650);
        assert_eq!(estimate_domain_age("x.io"), 30);
        assert_eq!(estimate_domain_age("abcdef.com"), 180);
        assert_eq!(estimate_domain_age("somethinglong.com"), 365);
        assert_eq!(estimate_domain_age(""), 30);
    }

    #[test]
    fn test_allowlists() {
        assert!(has_dns_record("wikipedia.org"));
        assert!(!has_dns_record("nero.com"));
        assert!(is_search_indexed("nero.com"));
        assert!(!is_search_indexed("evil.tld"));
    }

    #[test]
    fn test_group_uses_registrable_domain() {
        let context = UrlContext::new("https://mail.google.com/u/0");
        let features = DomainHeuristics.extract(&context);
        assert_eq!(
            features,
            vec![
                ("Age_of_domain", 3650.0),
                ("DNSRecord", 1.0),
                ("Google_Index", 1.0)
            ]
        );
    }
}
