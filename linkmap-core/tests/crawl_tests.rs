// Tests for crawl functionality

use async_trait::async_trait;
use linkmap_core::crawl::{
    CrawlOptions, build_seed_urls, execute_crawl, execute_crawl_with, extract_url_path,
    generate_crawl_summary,
};
use linkmap_scanner::{FetchError, Fetcher, ScanError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct SiteFetcher {
    pages: HashMap<String, String>,
}

impl SiteFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl Fetcher for SiteFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or(FetchError::Status(500))
    }
}

fn options(seeds: &[&str], max_depth: usize) -> CrawlOptions {
    CrawlOptions {
        seeds: seeds.iter().map(|s| s.to_string()).collect(),
        max_depth,
        ..CrawlOptions::default()
    }
}

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
}

#[test]
fn test_extract_url_path_empty_path() {
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/api/v1/users"), "/api/v1/users");
}

#[test]
fn test_extract_url_path_with_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_with_trailing_slash() {
    assert_eq!(extract_url_path("http://example.com/api/"), "/api/");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    // Should return original string for invalid URLs
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// Seed Construction Tests
// ============================================================================

#[test]
fn test_build_seed_urls_base_without_trailing_slash() {
    let paths = vec!["/blog".to_string()];
    assert_eq!(
        build_seed_urls("http://localhost:5000", &paths),
        vec!["http://localhost:5000/blog"]
    );
}

#[test]
fn test_build_seed_urls_keeps_path_verbatim() {
    let paths = vec!["/a/".to_string(), "/a".to_string()];
    assert_eq!(
        build_seed_urls("http://site/", &paths),
        vec!["http://site/a/", "http://site/a"]
    );
}

// ============================================================================
// Crawl Execution Tests
// ============================================================================

#[tokio::test]
async fn test_execute_crawl_maps_seed_routes() {
    let fetcher = SiteFetcher::new(&[
        (
            "http://site/blog",
            r#"<link href="/static/blog.css"><a href="/portfolio">work</a>"#,
        ),
        ("http://site/portfolio", r#"<img src="me.jpg">"#),
    ]);
    let seeds = build_seed_urls("http://site", &["/blog".to_string(), "/portfolio".to_string()]);
    let options = CrawlOptions {
        seeds,
        ..CrawlOptions::default()
    };

    let result = execute_crawl_with(fetcher, options, None).await.unwrap();

    let sources: Vec<&str> = result.graph.sources().collect();
    assert_eq!(sources, vec!["http://site/blog", "http://site/portfolio"]);
    assert_eq!(result.graph.edge_count(), 3);
    // blog.css and me.jpg are linked at depth 1 and fail to fetch
    assert_eq!(result.pages_failed(), 2);
}

#[tokio::test]
async fn test_execute_crawl_reports_failures_through_callback() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let fetcher = SiteFetcher::new(&[]);

    let result = execute_crawl_with(
        fetcher,
        options(&["http://down/"], 1),
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
    )
    .await
    .unwrap();

    assert!(result.graph.is_empty());
    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.contains("Failed to fetch http://down/")));
}

#[tokio::test]
async fn test_execute_crawl_rejects_empty_seeds() {
    let err = execute_crawl(CrawlOptions::default(), None).await.unwrap_err();
    assert!(matches!(err, ScanError::InvalidInput(_)));
}

#[tokio::test]
async fn test_generate_crawl_summary() {
    let fetcher = SiteFetcher::new(&[(
        "https://example.com/",
        r#"<a href="/about">about</a><script src="/app.js"></script><img src="/logo.png">"#,
    )]);

    let result = execute_crawl_with(fetcher, options(&["https://example.com/"], 0), None)
        .await
        .unwrap();
    let summary = generate_crawl_summary(&result);

    assert!(summary.contains("Pages mapped: 1"));
    assert!(summary.contains("Pages failed: 0"));
    assert!(summary.contains("Total edges: 3"));
    assert!(summary.contains("<a> 1"));
    assert!(summary.contains("<script> 1"));
    assert!(summary.contains("<img> 1"));
    assert!(summary.contains("<link> 0"));
    assert!(summary.contains("## example.com"));
}
