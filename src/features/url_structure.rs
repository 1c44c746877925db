use super::{bool_value, FeatureGroup, UrlContext};
use regex::Regex;

pub const SHORTENING_SERVICES: [&str; 10] = [
    "bit.ly",
    "goo.gl",
    "tinyurl.com",
    "t.co",
    "is.gd",
    "buff.ly",
    "adf.ly",
    "ow.ly",
    "tiny.cc",
    "bit.do",
];

pub const REDIRECT_KEYWORDS: [&str; 5] = ["redirect", "url=", "goto=", "link=", "out="];

/// Characters skipped before looking for a second `//`, enough to pass `http://`
const SCHEME_PREFIX_CHARS: usize = 7;

const MIN_DOMAIN_LENGTH: usize = 4;
const MAX_DOMAIN_LENGTH: usize = 30;

/// Structural checks on the URL string and its registrable domain
pub struct UrlStructureAnalyzer {
    ip_regex: Regex,
}

impl Default for UrlStructureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlStructureAnalyzer {
    pub fn new() -> Self {
        Self {
            ip_regex: Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").unwrap(),
        }
    }

    /// Dotted quad anywhere in the string, not only in the host
    pub fn has_ip_address(&self, url: &str) -> bool {
        self.ip_regex.is_match(url)
    }

    pub fn is_shortening_service(&self, domain: &str) -> bool {
        SHORTENING_SERVICES.contains(&domain)
    }

    pub fn has_at_symbol(&self, url: &str) -> bool {
        url.contains('@')
    }

    pub fn has_double_slash_redirect(&self, url: &str) -> bool {
        match url.char_indices().nth(SCHEME_PREFIX_CHARS) {
            Some((offset, _)) => url[offset..].contains("//"),
            None => false,
        }
    }

    pub fn has_prefix_suffix(&self, domain: &str) -> bool {
        domain.contains('-')
    }

    pub fn count_subdomains(&self, context: &UrlContext) -> usize {
        context
            .host
            .as_ref()
            .map(|host| host.subdomain_labels().count())
            .unwrap_or(0)
    }

    /// `https` inside the domain itself, e.g. `https-paypal.com`
    pub fn has_https_token(&self, domain: &str) -> bool {
        domain.to_lowercase().contains("https")
    }

    /// A written port other than the scheme default. Port 0 counts as absent.
    pub fn has_port(&self, context: &UrlContext) -> bool {
        context
            .host
            .as_ref()
            .and_then(|host| host.explicit_port)
            .is_some_and(|port| port != 0)
    }

    pub fn is_abnormal_domain(&self, domain: &str) -> bool {
        let length = domain.chars().count();
        length < MIN_DOMAIN_LENGTH || length > MAX_DOMAIN_LENGTH
    }

    pub fn has_redirect(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        REDIRECT_KEYWORDS
            .iter()
            .any(|keyword| lower.contains(keyword))
    }
}

impl FeatureGroup for UrlStructureAnalyzer {
    fn extract(&self, context: &UrlContext) -> Vec<(&'static str, f64)> {
        let url = context.url;
        let domain = context.domain();

        vec![
            ("having_IP_Address", bool_value(self.has_ip_address(url))),
            ("URL_Length", context.char_count as f64),
            (
                "Shortening_Service",
                bool_value(self.is_shortening_service(domain)),
            ),
            ("having_At_Symbol", bool_value(self.has_at_symbol(url))),
            (
                "double_slash_redirecting",
                bool_value(self.has_double_slash_redirect(url)),
            ),
            ("Prefix_Suffix", bool_value(self.has_prefix_suffix(domain))),
            ("having_Sub_Domain", self.count_subdomains(context) as f64),
            ("HTTPS_token", bool_value(self.has_https_token(domain))),
            ("having_port", bool_value(self.has_port(context))),
            ("Abnormal_URL", bool_value(self.is_abnormal_domain(domain))),
            ("Redirect", bool_value(self.has_redirect(url))),
        ]
    }

    fn name(&self) -> &str {
        "url_structure"
    }
}
