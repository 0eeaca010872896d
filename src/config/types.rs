use crate::crawler::DelayRange;
use serde::Deserialize;

/// Main configuration structure for Pattern-Scrape
///
/// Exactly one of `search` or `site` selects the crawl strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub search: Option<SearchConfig>,
    #[serde(default)]
    pub site: Option<SiteConfig>,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The crawl strategy a configuration selects
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    /// Paged search-result fan-out
    Search(&'a SearchConfig),
    /// Breadth-first walk of one site
    Site(&'a SiteConfig),
}

impl Config {
    /// Returns the configured strategy, or `None` unless exactly one is set
    pub fn strategy(&self) -> Option<Strategy<'_>> {
        match (&self.search, &self.site) {
            (Some(search), None) => Some(Strategy::Search(search)),
            (None, Some(site)) => Some(Strategy::Site(site)),
            _ => None,
        }
    }
}

/// Politeness delays applied by the fetcher
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Lower bound of the random delay before every page fetch (milliseconds)
    #[serde(rename = "min-delay-ms", default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the random delay before every page fetch (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Lower bound of the pause between search result pages (milliseconds)
    #[serde(rename = "search-min-delay-ms", default = "default_search_min_delay_ms")]
    pub search_min_delay_ms: u64,

    /// Upper bound of the pause between search result pages (milliseconds)
    #[serde(rename = "search-max-delay-ms", default = "default_search_max_delay_ms")]
    pub search_max_delay_ms: u64,
}

impl FetchConfig {
    /// Delay range applied before each page fetch
    pub fn page_delay(&self) -> DelayRange {
        DelayRange::from_millis(self.min_delay_ms, self.max_delay_ms)
    }

    /// Delay range applied between search result pages
    pub fn search_delay(&self) -> DelayRange {
        DelayRange::from_millis(self.search_min_delay_ms, self.search_max_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            search_min_delay_ms: default_search_min_delay_ms(),
            search_max_delay_ms: default_search_max_delay_ms(),
        }
    }
}

fn default_min_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    3000
}

fn default_search_min_delay_ms() -> u64 {
    2000
}

fn default_search_max_delay_ms() -> u64 {
    4000
}

/// Supported search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    DuckDuckGo,
    Google,
    Bing,
    /// Any engine accepting `?q=<query>` on `base-url`
    Generic,
}

/// Search strategy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Engine whose query template is used
    pub engine: SearchEngine,

    /// Base URL for the generic engine
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    /// Search terms
    pub query: String,

    /// Number of result pages to walk
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum concurrent page fetches per result page
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Maximum candidate URLs taken from each result page
    #[serde(rename = "results-per-page", default = "default_results_per_page")]
    pub results_per_page: usize,

    /// CSS selector for result links; defaults depend on the engine
    #[serde(rename = "result-selector", default)]
    pub result_selector: Option<String>,

    /// Result URLs whose path or query contains one of these are dropped
    #[serde(rename = "excluded-suffixes", default = "default_excluded_suffixes")]
    pub excluded_suffixes: Vec<String>,
}

impl SearchConfig {
    /// Returns the result selector, falling back to the engine default
    ///
    /// DuckDuckGo's HTML results mark links with `.result__url`; other engines
    /// fall back to every anchor on the page.
    pub fn result_selector(&self) -> &str {
        match (&self.result_selector, self.engine) {
            (Some(selector), _) => selector,
            (None, SearchEngine::DuckDuckGo) => ".result__url",
            (None, _) => "a",
        }
    }

    /// Returns the generic engine base URL, or an empty string
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_default()
    }
}

fn default_max_pages() -> u32 {
    3
}

fn default_max_workers() -> usize {
    3
}

fn default_results_per_page() -> usize {
    10
}

fn default_excluded_suffixes() -> Vec<String> {
    [".pdf", ".doc", ".docx", ".xlsx", ".txt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Site strategy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Page the breadth-first walk starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Number of internal pages to visit besides the seed
    #[serde(rename = "max-internal-pages", default = "default_max_internal_pages")]
    pub max_internal_pages: usize,
}

fn default_max_internal_pages() -> usize {
    10
}

/// Extraction configuration: which patterns and selectors run on each page
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Include the built-in emails/phones/websites patterns
    #[serde(rename = "default-patterns", default = "default_true")]
    pub default_patterns: bool,

    /// Include the built-in title/description/content selector groups
    #[serde(rename = "default-selectors", default = "default_true")]
    pub default_selectors: bool,

    /// User patterns; a name clash overrides the built-in pattern
    #[serde(default)]
    pub pattern: Vec<PatternEntry>,

    /// User selector groups
    #[serde(default)]
    pub selector: Vec<SelectorEntry>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_patterns: true,
            default_selectors: true,
            pattern: Vec::new(),
            selector: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A named regular expression
#[derive(Debug, Clone, Deserialize)]
pub struct PatternEntry {
    pub name: String,
    pub regex: String,
}

/// A field filled from an ordered list of CSS selectors
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorEntry {
    pub field: String,
    pub selectors: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON export
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,

    /// Path of the markdown table export
    #[serde(rename = "markdown-path", default)]
    pub markdown_path: Option<String>,
}
