//! Crawler module for page discovery, fetching, and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with politeness delays and browser headers
//! - Link resolution for site walks and search listings
//! - The crawl engine running either strategy

mod engine;
mod fetcher;
mod links;

pub use engine::{CrawlContext, CrawlEngine, CrawlOutcome, CrawlStats};
pub use fetcher::{
    browser_headers, build_http_client, random_user_agent, DelayRange, FetchRequest, HttpFetcher,
    PageFetcher, FETCH_TIMEOUT,
};
pub use links::{internal_links, search_result_links};

use crate::config::Config;
use crate::ScrapeError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the extraction plan from the configuration
/// 2. Build the HTTP fetcher with the configured delays
/// 3. Run the configured strategy
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Records and statistics of the crawl
/// * `Err(ScrapeError)` - The configuration was unusable
///
/// # Example
///
/// ```no_run
/// use pattern_scrape::config::load_config;
/// use pattern_scrape::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scrape.toml"))?;
/// let outcome = crawl(&config).await?;
/// println!("{} records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlOutcome, ScrapeError> {
    CrawlEngine::from_config(config)?.run(config).await
}
