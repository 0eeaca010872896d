//! URL handling module for Pattern-Scrape
//!
//! This module provides URL validation and normalization, seed-domain
//! extraction for the site strategy, and search URL construction for the
//! search strategy.

mod domain;
mod normalize;
mod search;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, host_in_domain, seed_domain};
pub use normalize::normalize_url;
pub use search::build_search_url;

/// Validates that a string is a fetchable URL
///
/// A fetchable URL parses as an absolute URL, uses the `http` or `https`
/// scheme, and has a non-empty host. Everything else is rejected before any
/// network activity.
///
/// # Examples
///
/// ```
/// use pattern_scrape::url::validate_fetch_url;
///
/// assert!(validate_fetch_url("https://example.com/page").is_ok());
/// assert!(validate_fetch_url("ftp://example.com/file").is_err());
/// assert!(validate_fetch_url("/relative/path").is_err());
/// ```
pub fn validate_fetch_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}
