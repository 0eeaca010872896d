use crate::config::SearchEngine;
use url::form_urlencoded;

/// Number of results each paginating engine shows per page
const RESULTS_PER_ENGINE_PAGE: u32 = 10;

/// Builds the results-page URL for a query on a search engine
///
/// Each engine has its own query-string template. Google and Bing paginate by
/// result offset, `(page - 1) * 10`; DuckDuckGo's HTML endpoint has no offset
/// parameter. The generic engine appends `?q=<query>` to the configured base URL.
///
/// The query is form-urlencoded (spaces become `+`).
///
/// # Examples
///
/// ```
/// use pattern_scrape::config::SearchEngine;
/// use pattern_scrape::url::build_search_url;
///
/// let url = build_search_url(&SearchEngine::Bing, "", "rust crawler", 3);
/// assert_eq!(url, "https://www.bing.com/search?q=rust+crawler&first=20");
/// ```
pub fn build_search_url(engine: &SearchEngine, base_url: &str, query: &str, page: u32) -> String {
    let encoded_query: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    let offset = page.saturating_sub(1).saturating_mul(RESULTS_PER_ENGINE_PAGE);

    match engine {
        SearchEngine::DuckDuckGo => {
            format!("https://html.duckduckgo.com/html/?q={}", encoded_query)
        }
        SearchEngine::Google => format!(
            "https://www.google.com/search?q={}&start={}",
            encoded_query, offset
        ),
        SearchEngine::Bing => format!(
            "https://www.bing.com/search?q={}&first={}",
            encoded_query, offset
        ),
        SearchEngine::Generic => format!("{}?q={}", base_url, encoded_query),
    }
}
