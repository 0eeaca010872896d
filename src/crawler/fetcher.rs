//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a fixed timeout
//! - Randomized browser headers and user agents per request
//! - A randomized politeness delay before each request
//! - Error classification (timeout, status, transport)

use crate::{FetchError, UrlError};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Upper bound on a single request, connect to last body byte
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Desktop browser user agents a request picks from
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.67",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// A uniformly sampled delay range
///
/// A zero range never sleeps, which is how tests disable pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// A range that never sleeps
    pub const NONE: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Creates a range; bounds given in the wrong order are swapped
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    pub fn from_secs(min: u64, max: u64) -> Self {
        Self::new(Duration::from_secs(min), Duration::from_secs(max))
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }

    /// Draws a duration uniformly from `[min, max]`
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let millis = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(millis as u64)
    }

    /// Sleeps for a sampled duration
    pub async fn sleep(&self) {
        if self.is_zero() {
            return;
        }
        let delay = self.sample();
        tracing::trace!("Sleeping {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::from_secs(1, 3)
    }
}

/// A validated request for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// The page to fetch; always http(s) with a host
    pub url: Url,

    /// Value of the `Referer` header, if any
    pub referer: Option<String>,
}

impl FetchRequest {
    /// Validates a URL string into a request
    pub fn new(url: &str) -> Result<Self, UrlError> {
        Ok(Self::from_url(crate::url::validate_fetch_url(url)?))
    }

    /// Wraps an already-validated URL
    pub fn from_url(url: Url) -> Self {
        Self { url, referer: None }
    }

    /// Refers the request to `<scheme>://<domain>/`; an empty domain sends none
    pub fn with_referer_domain(mut self, scheme: &str, domain: &str) -> Self {
        self.referer = if domain.is_empty() {
            None
        } else {
            Some(format!("{}://{}/", scheme, domain))
        };
        self
    }

    /// Refers the request to the root of the page it was found on
    pub fn with_referer_origin(mut self, source: &Url) -> Self {
        self.referer = Some(format!("{}/", source.origin().ascii_serialization()));
        self
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }
}

/// Something that can fetch a page's HTML
///
/// The engine only talks to this trait; [`HttpFetcher`] is the network
/// implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError>;
}

/// Builds the shared HTTP client
///
/// The client owns the connection pool and is safe to share across tasks.
/// Redirects are followed with reqwest's default policy.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(FETCH_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// Picks a user agent at random
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Builds the browser-like header set sent with every request
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(random_user_agent()),
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// Fetches pages over HTTP with politeness delays and browser headers
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    delay: DelayRange,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(delay: DelayRange) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?, delay))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, delay: DelayRange) -> Self {
        Self { client, delay }
    }

    pub fn delay(&self) -> DelayRange {
        self.delay
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a page after the politeness delay
    ///
    /// # Error Mapping
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx / 3xx | Ok(body) |
    /// | Other status | FetchError::Status |
    /// | Timeout (15s) | FetchError::Timeout |
    /// | Connection / TLS failure | FetchError::Http |
    /// | Body read failure | FetchError::Body |
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError> {
        self.delay.sleep().await;

        let url = request.url.as_str();
        let mut builder = self.client.get(request.url.clone()).headers(browser_headers());
        if let Some(referer) = request.referer() {
            builder = builder.header(header::REFERER, referer);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }
}
