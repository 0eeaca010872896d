//! Link resolution for both crawl strategies
//!
//! This module discovers candidate URLs on a parsed page:
//! - Internal links (same domain) for the site strategy
//! - Search-result links (result selector + excluded suffixes) for the search strategy
//!
//! Resolution never fails a page: links that cannot be resolved are dropped.

use crate::url::{host_in_domain, normalize_url, validate_fetch_url};
use indexmap::IndexSet;
use scraper::{Html, Selector};
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Extracts the same-domain links of a page
///
/// # Link Rules
///
/// **Discarded:**
/// - Empty and fragment-only (`#...`) hrefs
/// - `mailto:`, `tel:`, `javascript:` links
/// - Absolute links whose host does not contain `domain`
///
/// **Resolution:**
/// - `/path` is joined to the seed's scheme and host
/// - `path` without a leading slash is joined with a single `/`
/// - `//host/path` takes the seed's scheme
///
/// Results are normalized and deduplicated, in document order.
///
/// # Example
///
/// ```
/// use pattern_scrape::crawler::internal_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/about">About</a><a href="https://other.org/">Out</a>"#);
/// let seed = Url::parse("https://example.com/").unwrap();
/// let links = internal_links(&html, &seed, "example.com");
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// ```
pub fn internal_links(document: &Html, seed: &Url, domain: &str) -> Vec<Url> {
    let mut links: IndexSet<Url> = IndexSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_internal(href, seed, domain) {
                    links.insert(url);
                }
            }
        }
    }

    links.into_iter().collect()
}

/// Resolves one href against the seed and checks it stays on the domain
fn resolve_internal(href: &str, seed: &Url, domain: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let origin = seed.origin().ascii_serialization();
    let absolute = if href.starts_with("//") {
        format!("{}:{}", seed.scheme(), href)
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else if Url::parse(href).is_ok() {
        href.to_string()
    } else {
        format!("{}/{}", origin, href)
    };

    let url = match normalize_url(&absolute) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Dropping link {}: {}", href, e);
            return None;
        }
    };

    match url.host_str() {
        Some(host) if host_in_domain(host, domain) => Some(url),
        _ => None,
    }
}

/// Extracts result links from a search-results page
///
/// Each `href` of an element matched by `selector` must be an absolute
/// http(s) URL. DuckDuckGo redirect links (`/l/?uddg=<target>`) are unwrapped
/// to their target first. URLs whose path or query contains one of the
/// `excluded` suffixes (case-insensitive) are dropped. There is no domain
/// restriction. Results are deduplicated, in document order.
pub fn search_result_links(document: &Html, selector: &Selector, excluded: &[String]) -> Vec<Url> {
    let excluded: Vec<String> = excluded.iter().map(|s| s.to_lowercase()).collect();
    let mut links: IndexSet<Url> = IndexSet::new();

    for element in document.select(selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let href = href.trim();
        let candidate = if href.starts_with("//") {
            format!("https:{}", href)
        } else {
            href.to_string()
        };

        let url = match validate_fetch_url(&candidate) {
            Ok(url) => unwrap_redirect(url),
            Err(e) => {
                tracing::debug!("Skipping result link {}: {}", href, e);
                continue;
            }
        };

        if is_excluded(&url, &excluded) {
            tracing::debug!("Skipping excluded result link {}", url);
            continue;
        }

        links.insert(url);
    }

    links.into_iter().collect()
}

/// Follows a DuckDuckGo redirect link to its target, if it is one
fn unwrap_redirect(url: Url) -> Url {
    let is_redirect = url
        .host_str()
        .map(|host| host.ends_with("duckduckgo.com"))
        .unwrap_or(false)
        && url.path().starts_with("/l/");

    if !is_redirect {
        return url;
    }

    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .and_then(|(_, target)| validate_fetch_url(&target).ok())
        .unwrap_or(url)
}

/// Checks the URL's path and query against lowercase excluded suffixes
fn is_excluded(url: &Url, excluded: &[String]) -> bool {
    let path = url.path().to_lowercase();
    let query = url.query().unwrap_or_default().to_lowercase();

    excluded
        .iter()
        .any(|suffix| path.contains(suffix.as_str()) || query.contains(suffix.as_str()))
}
