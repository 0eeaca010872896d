use crate::config::types::{
    Config, ExtractionConfig, FetchConfig, OutputConfig, SearchConfig, SearchEngine, SiteConfig,
    Strategy,
};
use crate::url::validate_fetch_url;
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on concurrent fetches per result page
const MAX_WORKERS_LIMIT: usize = 100;

/// Validates the entire configuration
///
/// Everything checked here fails the run before any network activity.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;

    match config.strategy() {
        Some(Strategy::Search(search)) => validate_search_config(search)?,
        Some(Strategy::Site(site)) => validate_site_config(site)?,
        None => {
            return Err(ConfigError::Validation(
                "exactly one of [search] or [site] must be configured".to_string(),
            ))
        }
    }

    validate_extraction_config(&config.extraction)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetch delay ranges
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.search_min_delay_ms > config.search_max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "search-min-delay-ms ({}) must not exceed search-max-delay-ms ({})",
            config.search_min_delay_ms, config.search_max_delay_ms
        )));
    }

    Ok(())
}

/// Validates search strategy configuration
pub(crate) fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.query.trim().is_empty() {
        return Err(ConfigError::Validation(
            "search query cannot be empty".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-workers must be between 1 and {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    if config.results_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "results-per-page must be >= 1, got {}",
            config.results_per_page
        )));
    }

    if config.engine == SearchEngine::Generic {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            ConfigError::Validation("the generic engine requires base-url".to_string())
        })?;
        validate_fetch_url(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;
    }

    Selector::parse(config.result_selector()).map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid result-selector '{}': {:?}",
            config.result_selector(),
            e
        ))
    })?;

    if config.excluded_suffixes.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "excluded-suffixes cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates site strategy configuration
pub(crate) fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed-url cannot be empty".to_string(),
        ));
    }

    validate_fetch_url(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed-url '{}': {}", config.seed_url, e))
    })?;

    Ok(())
}

/// Validates pattern and selector entries
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if !config.default_patterns && config.pattern.is_empty() {
        return Err(ConfigError::Validation(
            "at least one extraction pattern is required".to_string(),
        ));
    }

    for entry in &config.pattern {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "pattern name cannot be empty".to_string(),
            ));
        }
        if entry.regex.is_empty() {
            return Err(ConfigError::Validation(format!(
                "pattern '{}' has an empty regex",
                entry.name
            )));
        }
    }

    for entry in &config.selector {
        if entry.field.trim().is_empty() {
            return Err(ConfigError::Validation(
                "selector field cannot be empty".to_string(),
            ));
        }
        if entry.selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector field '{}' must list at least one selector",
                entry.field
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.json_path.as_deref(), Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "json-path cannot be empty".to_string(),
        ));
    }

    if matches!(config.markdown_path.as_deref(), Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "markdown-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
