use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pattern_scrape::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the domain a site crawl is confined to
///
/// This is the seed host with any leading `www.` removed, so that links to
/// both `www.example.com` and `example.com` stay inside the crawl.
pub fn seed_domain(seed: &Url) -> Option<String> {
    extract_domain(seed).map(|host| match host.strip_prefix("www.") {
        Some(bare) => bare.to_string(),
        None => host,
    })
}

/// Checks whether a link host belongs to the seed domain
///
/// The check is containment: any host whose name contains the seed domain is
/// accepted, which covers subdomains such as `blog.example.com`.
pub fn host_in_domain(host: &str, domain: &str) -> bool {
    !domain.is_empty() && host.to_lowercase().contains(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_seed_domain_strips_www() {
        let url = Url::parse("https://www.example.com/start").unwrap();
        assert_eq!(seed_domain(&url), Some("example.com".to_string()));

        let url = Url::parse("https://shop.example.com/").unwrap();
        assert_eq!(seed_domain(&url), Some("shop.example.com".to_string()));
    }

    #[test]
    fn test_host_in_domain() {
        assert!(host_in_domain("example.com", "example.com"));
        assert!(host_in_domain("www.example.com", "example.com"));
        assert!(host_in_domain("blog.Example.com", "example.com"));
        assert!(!host_in_domain("other.org", "example.com"));
        assert!(!host_in_domain("example.com", ""));
    }
}
