//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: configuration, fetching, extraction,
//! aggregation, and export.

use pattern_scrape::config::{parse_config, Config};
use pattern_scrape::crawler::CrawlEngine;
use pattern_scrape::output::{aggregate, export};
use pattern_scrape::FieldValue;
use tempfile::TempDir;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL_REGEX: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Builds a configuration with pacing disabled and only an email pattern
fn create_test_config(strategy: &str) -> Config {
    let content = format!(
        r#"
[fetch]
min-delay-ms = 0
max-delay-ms = 0
search-min-delay-ms = 0
search-max-delay-ms = 0

{strategy}

[extraction]
default-patterns = false
default-selectors = false

[[extraction.pattern]]
name = "emails"
regex = '{EMAIL_REGEX}'

[[extraction.selector]]
field = "title"
selectors = ["h1"]
"#
    );
    parse_config(&content).expect("Failed to parse test config")
}

fn site_strategy(seed: &str, max_internal_pages: usize) -> String {
    format!(
        "[site]\nseed-url = \"{}\"\nmax-internal-pages = {}\n",
        seed, max_internal_pages
    )
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_site_crawl_visits_each_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<h1>Home</h1><a href="/about">About</a><a href="/team">Team</a><a href="/about#top">About</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/about",
        r#"<p>Contact us at hello@acme.test</p><a href="/">Home</a><a href="/team">Team</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/team",
        r#"<p>ana@acme.test, bo@acme.test</p><a href="https://elsewhere.test/">Out</a>"#,
        1,
    )
    .await;

    let config = create_test_config(&site_strategy(&base_url, 10));
    let engine = CrawlEngine::from_config(&config).unwrap();
    let outcome = engine.run(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stats.pages_fetched, 3);
    assert_eq!(outcome.stats.pages_failed, 0);

    let urls: Vec<&str> = outcome.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/about", base_url),
            format!("{}/team", base_url),
        ]
    );
    assert_eq!(
        outcome.records[2].get("emails"),
        Some(&FieldValue::Multi(vec![
            "ana@acme.test".to_string(),
            "bo@acme.test".to_string()
        ]))
    );
}

#[tokio::test]
async fn test_site_crawl_single_page_budget() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<p>Write to a@b.com</p><a href="/next">Next</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/next", "<p>never@fetched.test</p>", 0).await;

    let config = create_test_config(&site_strategy(&mock_server.uri(), 0));
    let outcome = CrawlEngine::from_config(&config)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(
        outcome.records[0].get("emails"),
        Some(&FieldValue::Multi(vec!["a@b.com".to_string()]))
    );
}

#[tokio::test]
async fn test_site_crawl_continues_after_server_error() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/contact">Contact</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/contact", "<p>sales@acme.test</p>", 1).await;

    let config = create_test_config(&site_strategy(&mock_server.uri(), 5));
    let outcome = CrawlEngine::from_config(&config)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    assert_eq!(outcome.stats.pages_failed, 1);
    // the seed has no matches and is not kept
    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.records[0].url.ends_with("/contact"));
}

#[tokio::test]
async fn test_requests_carry_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("dnt", "1"))
        .and(header("upgrade-insecure-requests", "1"))
        .and(header("referer", "http://127.0.0.1/"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(html_page("<p>a@b.com</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&site_strategy(&mock_server.uri(), 0));
    let outcome = CrawlEngine::from_config(&config)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_search_fan_out_skips_excluded_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "coffee shops"))
        .respond_with(html_page(&format!(
            r#"
            <a href="{0}/r1">First</a>
            <a href="{0}/files/menu.pdf">Menu</a>
            <a href="{0}/r2">Second</a>
            "#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/r1", "<h1>Roastery</h1><p>beans@roast.test</p>", 1).await;
    mount_page(&mock_server, "/r2", "<p>no contact here</p>", 1).await;
    mount_page(&mock_server, "/files/menu.pdf", "pdf", 0).await;

    let config = create_test_config(&format!(
        "[search]\nengine = \"generic\"\nbase-url = \"{}/search\"\nquery = \"coffee shops\"\nmax-pages = 1\nmax-workers = 2\n",
        base_url
    ));
    let outcome = CrawlEngine::from_config(&config)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    assert_eq!(outcome.stats.listings_fetched, 1);
    assert_eq!(outcome.stats.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn test_search_results_exported_as_exploded_table() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_page(&format!(r#"<a href="{}/shop">Shop</a>"#, base_url)))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/shop",
        "<h1>Shop</h1><p>one@shop.test</p><p>two@shop.test</p>",
        1,
    )
    .await;

    let config = create_test_config(&format!(
        "[search]\nengine = \"generic\"\nbase-url = \"{}/search\"\nquery = \"shop\"\nmax-pages = 1\n",
        base_url
    ));
    let outcome = CrawlEngine::from_config(&config)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    let table = aggregate(&outcome.records);
    assert_eq!(table.columns(), &["url", "timestamp", "title", "emails"]);
    assert_eq!(table.len(), 2);

    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("results.json");
    let mut output = config.output.clone();
    output.json_path = Some(json_path.to_string_lossy().into_owned());
    assert_eq!(export(&table, &output).unwrap(), 1);

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let rows = exported.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["title"], "Shop");
    assert_eq!(rows[0]["emails"], "one@shop.test");
    assert_eq!(rows[1]["emails"], "two@shop.test");
    assert_eq!(rows[1]["url"], format!("{}/shop", base_url));
}
