use url::{Host, Url};

/// Host information recovered from a URL string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHost {
    pub host: String,
    /// Registrable domain (public suffix plus the label directly left of it).
    /// IP literals and hosts without a listed suffix use the whole host.
    pub registrable_domain: String,
    pub subdomain: String,
    pub is_ip: bool,
    /// Port written in the URL, `None` when absent or equal to the scheme default
    pub explicit_port: Option<u16>,
}

impl ParsedHost {
    pub fn subdomain_labels(&self) -> impl Iterator<Item = &str> {
        self.subdomain.split('.').filter(|label| !label.is_empty())
    }
}

/// Minimal URL and domain hierarchy utilities
pub struct DomainUtils;

impl DomainUtils {
    /// Prepend `http://` unless the URL already carries an http(s) scheme
    pub fn normalize_url(url: &str) -> String {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }

    /// Best-effort parse. Input without `://` is retried with an `http://` prefix
    /// so that bare hosts like `bit.ly/abc` still yield a host.
    pub fn parse_url(url: &str) -> Option<Url> {
        let parsed = Url::parse(url).ok();
        if parsed.as_ref().is_some_and(Self::has_named_host) {
            return parsed;
        }

        if !url.contains("://") {
            if let Ok(retry) = Url::parse(&format!("http://{}", url)) {
                if Self::has_named_host(&retry) {
                    return Some(retry);
                }
            }
        }

        parsed
    }

    pub fn parse_host(url: &str) -> Option<ParsedHost> {
        let parsed = Self::parse_url(url)?;
        let explicit_port = parsed.port();

        let (host, is_ip) = match parsed.host()? {
            Host::Domain(domain) => (domain.trim_end_matches('.').to_lowercase(), false),
            Host::Ipv4(addr) => (addr.to_string(), true),
            Host::Ipv6(addr) => (addr.to_string(), true),
        };

        if host.is_empty() {
            return None;
        }

        if is_ip {
            return Some(ParsedHost {
                registrable_domain: host.clone(),
                host,
                subdomain: String::new(),
                is_ip,
                explicit_port,
            });
        }

        let registrable_domain = Self::registrable_domain(&host);
        let subdomain = host
            .strip_suffix(registrable_domain.as_str())
            .map(|rest| rest.trim_end_matches('.').to_string())
            .unwrap_or_default();

        Some(ParsedHost {
            host,
            registrable_domain,
            subdomain,
            is_ip,
            explicit_port,
        })
    }

    /// Registrable domain of a lowercase host name: the ICANN public suffix plus
    /// the label directly left of it. Private-section entries such as
    /// `herokuapp.com` are not treated as suffixes.
    pub fn registrable_domain(host: &str) -> String {
        let Some(suffix) = Self::icann_suffix(host) else {
            return host.to_string();
        };

        let label = host
            .strip_suffix(suffix)
            .and_then(|rest| rest.strip_suffix('.'))
            .and_then(|rest| rest.rsplit('.').next())
            .filter(|label| !label.is_empty());

        match label {
            Some(label) => format!("{}.{}", label, suffix),
            None => host.to_string(),
        }
    }

    /// Longest matching public suffix from the ICANN section of the list.
    /// A private match is retried on what is left after its first label.
    pub fn icann_suffix(host: &str) -> Option<&str> {
        let mut candidate = host;
        loop {
            let suffix = psl::suffix(candidate.as_bytes())?;
            let start = candidate.len().checked_sub(suffix.as_bytes().len())?;
            let suffix_str = candidate.get(start..)?;
            if !matches!(suffix.typ(), Some(psl::Type::Private)) {
                return Some(suffix_str);
            }
            candidate = suffix_str.split_once('.')?.1;
        }
    }

    /// Registrable domain of a URL, empty when no host can be recovered
    pub fn extract_domain(url: &str) -> String {
        Self::parse_host(url)
            .map(|parsed| parsed.registrable_domain)
            .unwrap_or_default()
    }

    fn has_named_host(url: &Url) -> bool {
        url.host_str().is_some_and(|host| !host.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(DomainUtils::normalize_url("bit.ly/abc"), "http://bit.ly/abc");
        assert_eq!(
            DomainUtils::normalize_url("https://example.com"),
            "https://example.com"
        );
        assert_eq!(
            DomainUtils::normalize_url("HTTP://example.com"),
            "HTTP://example.com"
        );
        assert_eq!(DomainUtils::normalize_url(""), "http://");
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            DomainUtils::extract_domain("https://mail.google.com/inbox"),
            "google.com"
        );
        assert_eq!(DomainUtils::extract_domain("bit.ly/abc"), "bit.ly");
        assert_eq!(
            DomainUtils::extract_domain("http://news.bbc.co.uk/"),
            "bbc.co.uk"
        );
        assert_eq!(DomainUtils::extract_domain(""), "");
        assert_eq!(DomainUtils::extract_domain("http://"), "");
    }

    #[test]
    fn test_parse_host_subdomains() {
        let parsed = DomainUtils::parse_host("http://a.b.c.example.com/x").unwrap();
        assert_eq!(parsed.registrable_domain, "example.com");
        assert_eq!(parsed.subdomain, "a.b.c");
        assert_eq!(parsed.subdomain_labels().count(), 3);
        assert!(!parsed.is_ip);
    }

    #[test]
    fn test_parse_host_ip_literal() {
        let parsed = DomainUtils::parse_host("http://192.168.1.1/login").unwrap();
        assert!(parsed.is_ip);
        assert_eq!(parsed.registrable_domain, "192.168.1.1");
        assert_eq!(parsed.subdomain_labels().count(), 0);
    }

    #[test]
    fn test_parse_host_userinfo_and_port() {
        let parsed = DomainUtils::parse_host("http://192.168.1.1@evil.tld:8080/").unwrap();
        assert_eq!(parsed.host, "evil.tld");
        assert_eq!(parsed.explicit_port, Some(8080));

        let default_port = DomainUtils::parse_host("https://example.com:443/").unwrap();
        assert_eq!(default_port.explicit_port, None);
    }

    #[test]
    fn test_private_suffixes_are_not_registrable_units() {
        let parsed = DomainUtils::parse_host("http://paypal-login.herokuapp.com/").unwrap();
        assert_eq!(parsed.registrable_domain, "herokuapp.com");
        assert_eq!(parsed.subdomain, "paypal-login");

        let parsed = DomainUtils::parse_host("http://secure.login.bank.blogspot.com/").unwrap();
        assert_eq!(parsed.registrable_domain, "blogspot.com");
        assert_eq!(parsed.subdomain_labels().count(), 3);

        let parsed = DomainUtils::parse_host("http://x.github.io/").unwrap();
        assert_eq!(parsed.registrable_domain, "github.io");
        assert_eq!(parsed.subdomain_labels().count(), 1);

        assert_eq!(DomainUtils::icann_suffix("blog.example.co.uk"), Some("co.uk"));
        assert_eq!(DomainUtils::registrable_domain("com"), "com");
    }

    #[test]
    fn test_parse_host_without_suffix() {
        let parsed = DomainUtils::parse_host("localhost:3000/admin").unwrap();
        assert_eq!(parsed.registrable_domain, "localhost");
        assert_eq!(parsed.explicit_port, Some(3000));
    }
}
