//! Configuration module for Pattern-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pattern_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Fetch delay: {:?}", config.fetch.page_delay());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractionConfig, FetchConfig, OutputConfig, PatternEntry, SearchConfig,
    SearchEngine, SelectorEntry, SiteConfig, Strategy,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
pub(crate) use validation::{validate_search_config, validate_site_config};

pub use crate::extract::ExtractionPlan;
