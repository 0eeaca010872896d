//! Pattern-Scrape: a polite crawl-and-extract engine
//!
//! This crate discovers web pages, either through search-engine result pages or
//! by walking a single site breadth-first, and extracts structured fields from
//! them with CSS selectors and regular expressions. Extraction records are
//! aggregated into a table and handed to a table sink (JSON, markdown).

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Pattern-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Page error for {url}: {message}")]
    Page { url: String, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors from a single page fetch
///
/// A fetch error is terminal for that URL only; callers log it and move on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Classifies a transport error the way the fetcher reports it
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Result type alias for Pattern-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlOutcome};
pub use extract::{ExtractionPlan, ExtractionRecord, FieldValue};
pub use output::{aggregate, ResultTable};
pub use state::PageState;
pub use crate::url::{build_search_url, normalize_url, validate_fetch_url};
