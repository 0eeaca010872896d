//! Crawl engine - orchestration of both traversal strategies
//!
//! This module drives a crawl from configuration to extraction records:
//! - Site strategy: sequential breadth-first walk of one domain
//! - Search strategy: paged result listings fanned out to bounded workers
//! - Per-page error containment (a failed page never fails the crawl)
//! - Crawl statistics

use crate::config::{
    validate_search_config, validate_site_config, Config, SearchConfig, SiteConfig, Strategy,
};
use crate::crawler::fetcher::{DelayRange, FetchRequest, HttpFetcher, PageFetcher};
use crate::crawler::links::{internal_links, search_result_links};
use crate::extract::{ExtractionPlan, ExtractionRecord};
use crate::state::{Frontier, PageState};
use crate::url::{build_search_url, normalize_url, seed_domain};
use crate::{ConfigError, ScrapeError, UrlError};
use scraper::{Html, Selector};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;
use url::Url;

/// Counters collected over one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Pages fetched successfully (listings excluded)
    pub pages_fetched: usize,

    /// Pages whose fetch or extraction failed
    pub pages_failed: usize,

    /// Search result listings fetched
    pub listings_fetched: usize,

    /// Search result listings that could not be fetched
    pub listings_failed: usize,

    /// Extraction records kept
    pub records: usize,

    /// Wall time of the crawl
    pub elapsed: Duration,
}

/// Records and statistics produced by one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub records: Vec<ExtractionRecord>,
    pub stats: CrawlStats,
}

/// State scoped to a single crawl invocation
///
/// Holds the fetcher and the tracing span every log line of the crawl is
/// recorded under. Dropped when the crawl returns.
pub struct CrawlContext {
    fetcher: Arc<dyn PageFetcher>,
    span: tracing::Span,
}

impl CrawlContext {
    pub fn new(fetcher: Arc<dyn PageFetcher>, span: tracing::Span) -> Self {
        Self { fetcher, span }
    }

    pub fn fetcher(&self) -> &Arc<dyn PageFetcher> {
        &self.fetcher
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

/// Runs crawls against a page fetcher with one extraction plan
pub struct CrawlEngine {
    fetcher: Arc<dyn PageFetcher>,
    plan: Arc<ExtractionPlan>,
    search_delay: DelayRange,
}

impl CrawlEngine {
    /// Creates an engine
    ///
    /// Search pacing defaults to 2-4 seconds between result pages.
    pub fn new(fetcher: Arc<dyn PageFetcher>, plan: ExtractionPlan) -> Self {
        Self {
            fetcher,
            plan: Arc::new(plan),
            search_delay: DelayRange::from_secs(2, 4),
        }
    }

    /// Sets the pause taken between search result pages
    pub fn with_search_delay(mut self, delay: DelayRange) -> Self {
        self.search_delay = delay;
        self
    }

    /// Builds an HTTP-backed engine from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let plan = ExtractionPlan::from_config(&config.extraction)?;
        let fetcher = HttpFetcher::new(config.fetch.page_delay())?;

        Ok(Self::new(Arc::new(fetcher), plan).with_search_delay(config.fetch.search_delay()))
    }

    pub fn plan(&self) -> &ExtractionPlan {
        &self.plan
    }

    /// Runs whichever strategy the configuration selects
    pub async fn run(&self, config: &Config) -> Result<CrawlOutcome, ScrapeError> {
        match config.strategy() {
            Some(Strategy::Search(search)) => self.run_search(search).await,
            Some(Strategy::Site(site)) => self.run_site(site).await,
            None => Err(ConfigError::Validation(
                "exactly one of [search] or [site] must be configured".to_string(),
            )
            .into()),
        }
    }

    /// Walks one site breadth-first from its seed URL
    ///
    /// # Traversal Rules
    ///
    /// - The frontier starts with the normalized seed and is popped FIFO
    /// - A URL is marked visited before it is fetched, and never fetched twice
    /// - The walk stops once more than `max-internal-pages` URLs are visited,
    ///   so at most `max-internal-pages + 1` pages are fetched
    /// - Fetch failures are logged and skipped
    /// - A record is kept only if at least one field matched
    /// - Links are discovered only while fewer than `max-internal-pages`
    ///   URLs have been visited
    ///
    /// Configuration errors are returned before any request is made.
    pub async fn run_site(&self, site: &SiteConfig) -> Result<CrawlOutcome, ScrapeError> {
        validate_site_config(site)?;

        let seed = normalize_url(&site.seed_url)?;
        let domain = seed_domain(&seed).ok_or(UrlError::MissingDomain)?;

        let context = CrawlContext::new(
            Arc::clone(&self.fetcher),
            tracing::info_span!("crawl", strategy = "site", seed = %seed),
        );
        let span = context.span().clone();

        self.site_loop(&context, seed, &domain, site.max_internal_pages)
            .instrument(span)
            .await
    }

    async fn site_loop(
        &self,
        context: &CrawlContext,
        seed: Url,
        domain: &str,
        max_pages: usize,
    ) -> Result<CrawlOutcome, ScrapeError> {
        let start_time = Instant::now();
        let mut outcome = CrawlOutcome::default();
        let mut frontier = Frontier::new(seed.clone(), max_pages.saturating_add(1));

        tracing::info!("Starting site crawl of {} (up to {} internal pages)", domain, max_pages);

        while let Some(url) = frontier.pop() {
            if frontier.visited_count() > max_pages {
                break;
            }
            if frontier.is_visited(&url) {
                continue;
            }

            frontier.mark(&url, PageState::Fetching);
            tracing::debug!("Fetching {}", url);

            let request =
                FetchRequest::from_url(url.clone()).with_referer_domain(seed.scheme(), domain);
            let html = match context.fetcher().fetch(&request).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    frontier.mark(&url, PageState::FetchFailed);
                    outcome.stats.pages_failed += 1;
                    continue;
                }
            };

            let discover = frontier.visited_count() < max_pages;
            let extracted = contain_page_panic(url.as_str(), || {
                let document = Html::parse_document(&html);
                let record = self.plan.extract_document(url.as_str(), &document);
                let links = if discover {
                    internal_links(&document, &seed, domain)
                } else {
                    Vec::new()
                };
                (record, links)
            });
            let (record, links) = match extracted {
                Ok(extracted) => extracted,
                Err(e) => {
                    tracing::warn!("{}", e);
                    frontier.mark(&url, PageState::FetchFailed);
                    outcome.stats.pages_failed += 1;
                    continue;
                }
            };
            outcome.stats.pages_fetched += 1;
            frontier.mark(&url, PageState::Extracted);

            if record.has_fields() {
                tracing::info!("Extracted {} fields from {}", record.fields.len(), url);
                outcome.records.push(record);
            } else {
                tracing::debug!("No fields matched on {}", url);
            }

            let enqueued = links.into_iter().filter(|link| frontier.push(link.clone())).count();
            if enqueued > 0 {
                tracing::debug!("Enqueued {} new links from {}", enqueued, url);
            }

            if frontier.visited_count() % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = frontier.visited_count() as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    frontier.visited_count(),
                    frontier.pending_count(),
                    rate
                );
            }
        }

        outcome.stats.records = outcome.records.len();
        outcome.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Site crawl completed: {} pages visited, {} records in {:?}",
            frontier.visited_count(),
            outcome.stats.records,
            outcome.stats.elapsed
        );

        Ok(outcome)
    }

    /// Walks search result pages and extracts every result in parallel
    ///
    /// # Fan-out Rules
    ///
    /// - Result pages `1..=max-pages` are processed one after another
    /// - A listing that cannot be fetched is logged and skipped
    /// - Up to `results-per-page` result links are taken per listing
    /// - At most `max-workers` result fetches run at once; all of them finish
    ///   before the next listing is requested
    /// - Every successfully fetched result yields a record, matched or not
    /// - A failing or panicking result task affects only its own URL
    ///
    /// Configuration errors are returned before any request is made.
    pub async fn run_search(&self, search: &SearchConfig) -> Result<CrawlOutcome, ScrapeError> {
        validate_search_config(search)?;

        let selector = Selector::parse(search.result_selector()).map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid result-selector '{}': {:?}",
                search.result_selector(),
                e
            ))
        })?;

        let context = CrawlContext::new(
            Arc::clone(&self.fetcher),
            tracing::info_span!("crawl", strategy = "search", query = %search.query),
        );
        let span = context.span().clone();

        self.search_loop(&context, search, &selector)
            .instrument(span)
            .await
    }

    async fn search_loop(
        &self,
        context: &CrawlContext,
        search: &SearchConfig,
        selector: &Selector,
    ) -> Result<CrawlOutcome, ScrapeError> {
        let start_time = Instant::now();
        let mut outcome = CrawlOutcome::default();

        tracing::info!(
            "Starting search for '{}' ({} pages, {} workers)",
            search.query,
            search.max_pages,
            search.max_workers
        );

        for page in 1..=search.max_pages {
            if page > 1 {
                self.search_delay.sleep().await;
            }

            let search_url = build_search_url(&search.engine, search.base_url(), &search.query, page);
            let request = match FetchRequest::new(&search_url) {
                Ok(request) => request,
                Err(e) => {
                    tracing::debug!("Invalid search URL {}: {}", search_url, e);
                    outcome.stats.listings_failed += 1;
                    continue;
                }
            };

            let listing = match context.fetcher().fetch(&request).await {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!("Skipping result page {}: {}", page, e);
                    outcome.stats.listings_failed += 1;
                    continue;
                }
            };
            outcome.stats.listings_fetched += 1;

            let mut candidates = {
                let document = Html::parse_document(&listing);
                search_result_links(&document, selector, &search.excluded_suffixes)
            };
            candidates.truncate(search.results_per_page);

            tracing::info!("Result page {}: {} candidate URLs", page, candidates.len());

            let records = self
                .fan_out(context, candidates, &request.url, search.max_workers, &mut outcome.stats)
                .await;
            outcome.records.extend(records);
        }

        outcome.stats.records = outcome.records.len();
        outcome.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Search completed: {} pages fetched, {} failed, {} records in {:?}",
            outcome.stats.pages_fetched,
            outcome.stats.pages_failed,
            outcome.stats.records,
            outcome.stats.elapsed
        );

        Ok(outcome)
    }

    /// Fetches and extracts candidate URLs with at most `max_workers` in flight
    ///
    /// Returns once every task has finished. Record order follows task
    /// completion.
    async fn fan_out(
        &self,
        context: &CrawlContext,
        candidates: Vec<Url>,
        listing: &Url,
        max_workers: usize,
        stats: &mut CrawlStats,
    ) -> Vec<ExtractionRecord> {
        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut tasks = JoinSet::new();

        for url in candidates {
            let fetcher = Arc::clone(context.fetcher());
            let plan = Arc::clone(&self.plan);
            let semaphore = Arc::clone(&semaphore);
            let request = FetchRequest::from_url(url).with_referer_origin(listing);

            tasks.spawn(
                fetch_and_extract(fetcher, plan, semaphore, request)
                    .instrument(context.span().clone()),
            );
        }

        let mut records = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(record)) => {
                    stats.pages_fetched += 1;
                    records.push(record);
                }
                Ok(Err(e)) => {
                    stats.pages_failed += 1;
                    tracing::warn!("{}", e);
                }
                Err(e) => {
                    stats.pages_failed += 1;
                    tracing::error!("Result task failed: {}", e);
                }
            }
        }

        records
    }
}

/// One search result task: wait for a worker slot, fetch, extract
async fn fetch_and_extract(
    fetcher: Arc<dyn PageFetcher>,
    plan: Arc<ExtractionPlan>,
    semaphore: Arc<Semaphore>,
    request: FetchRequest,
) -> Result<ExtractionRecord, ScrapeError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| ScrapeError::Page {
            url: request.url.to_string(),
            message: e.to_string(),
        })?;

    let html = fetcher.fetch(&request).await?;
    extract_contained(&plan, request.url.as_str(), &html)
}

/// Runs extraction, turning a panic into a page error for that URL
fn extract_contained(
    plan: &ExtractionPlan,
    url: &str,
    html: &str,
) -> Result<ExtractionRecord, ScrapeError> {
    contain_page_panic(url, || plan.extract(url, html))
}

/// Runs per-page work, turning a panic into a page error for that URL
fn contain_page_panic<T>(url: &str, work: impl FnOnce() -> T) -> Result<T, ScrapeError> {
    std::panic::catch_unwind(AssertUnwindSafe(work)).map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "extraction panicked".to_string());
        ScrapeError::Page {
            url: url.to_string(),
            message,
        }
    })
}
