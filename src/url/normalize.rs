use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a URL so that equivalent links deduplicate in the frontier
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not `http` or `https`
/// 3. Lowercase the host (the scheme is kept as-is, the page is fetched as linked)
/// 4. Normalize path:
///    - Remove dot segments (. and ..)
///    - Collapse repeated slashes
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters; the remaining pairs keep their
///    order and original encoding (`?print` stays `?print`)
/// 7. Remove empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use pattern_scrape::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM//a/./b?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/a/b");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {
            let normalized_host = host.to_lowercase();
            url.set_host(Some(&normalized_host))
                .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
        }
        _ => return Err(UrlError::MissingDomain),
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    let kept_query = url.query().map(strip_tracking_params);
    if let Some(query) = kept_query {
        url.set_query(if query.is_empty() { None } else { Some(&query) });
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and empty segments
///
/// A trailing slash is preserved, since many servers treat `/dir/` and `/dir`
/// as different resources.
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    let mut result = format!("/{}", normalized_segments.join("/"));
    if path.ends_with('/') {
        result.push('/');
    }
    result
}

/// Drops tracking pairs and empty segments from a raw query string
fn strip_tracking_params(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            url::form_urlencoded::parse(pair.as_bytes())
                .next()
                .map_or(true, |(key, _)| !is_tracking_param(&key))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_scheme() {
        let result = normalize_url("http://example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_keeps_www() {
        let result = normalize_url("https://www.example.com/").unwrap();
        assert_eq!(result.as_str(), "https://www.example.com/");
    }

    #[test]
    fn test_keeps_trailing_slash() {
        let result = normalize_url("https://example.com/dir/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/dir/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_tracking_params() {
        let result = normalize_url("https://example.com/page?utm_source=twitter").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keeps_query_order() {
        let result = normalize_url("https://example.com/page?b=2&a=1").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?b=2&a=1");
    }

    #[test]
    fn test_keeps_query_encoding() {
        let result = normalize_url("https://example.com/page?z=1&print&q=a%20b").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?z=1&print&q=a%20b");

        let result =
            normalize_url("https://example.com/page?z=1&utm_source=x&print&&q=a%20b").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?z=1&print&q=a%20b");
    }

    #[test]
    fn test_mixed_query_params() {
        let result = normalize_url(
            "https://example.com/page?keep=yes&utm_medium=email&another=value&fbclid=123",
        )
        .unwrap();
        assert_eq!(
            result.as_str(),
            "https://example.com/page?keep=yes&another=value"
        );
    }

    #[test]
    fn test_normalize_path_with_dots() {
        let result = normalize_url("https://example.com/a/../b/./c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_lowercase_domain() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_multiple_slashes() {
        let result = normalize_url("https://example.com///path//to///page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/path/to/page");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_url("not a url").is_err());
    }
}
