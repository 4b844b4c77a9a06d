use colored::Colorize;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use linkmap_scanner::error::{Result, ScanError};
use linkmap_scanner::{CrawlResult, Crawler, Fetcher, HttpFetcher, RedirectPolicy, ReferenceKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seeds: Vec<String>,
    pub workers: usize,
    pub max_depth: usize,
    pub timeout_secs: u64,
    pub redirects: RedirectPolicy,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            workers: 1,
            max_depth: 1,
            timeout_secs: 10,
            redirects: RedirectPolicy::default(),
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Host of a URL, or `"unknown"` for anything without one.
pub fn extract_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Seeds for crawling a fixed set of routes on one site.
///
/// Each seed is `base` without its trailing slashes followed by the path
/// as given. With no paths the base itself is the only seed.
pub fn build_seed_urls(base: &str, paths: &[String]) -> Vec<String> {
    if paths.is_empty() {
        return vec![base.to_string()];
    }

    let base = base.trim_end_matches('/');
    paths.iter().map(|path| format!("{}{}", base, path)).collect()
}

/// Execute a crawl over HTTP with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlResult> {
    let fetcher = HttpFetcher::with_settings(options.timeout_secs, options.redirects)?;
    execute_crawl_with(fetcher, options, progress_callback).await
}

/// Execute a crawl with a caller-supplied fetcher
pub async fn execute_crawl_with<F: Fetcher>(
    fetcher: F,
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlResult> {
    let CrawlOptions {
        seeds,
        workers,
        max_depth,
        timeout_secs,
        redirects: _,
        show_progress_bars,
    } = options;

    if seeds.is_empty() {
        return Err(ScanError::InvalidInput("no seed URLs were provided".to_string()));
    }

    if let Some(ref callback) = progress_callback {
        callback(format!(
            "Mapping {} seed(s) to depth {} with {} worker(s)",
            seeds.len(),
            max_depth,
            workers
        ));
    }

    // Single spinner for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let mut crawler = Crawler::with_fetcher(fetcher)
        .with_max_depth(max_depth)
        .with_workers(workers)
        .with_fetch_timeout(Duration::from_secs(timeout_secs));

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let count_clone = processed_count.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |depth: usize, url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!(
                "Crawling... {} URLs processed [depth {}] {}",
                count,
                depth,
                extract_url_path(&url)
            ));
            pb_clone.tick();
        }));
    }

    let result = crawler.run(&seeds).await;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Crawl complete! {} URLs processed", total));
    }

    let result = result?;

    if let Some(ref callback) = progress_callback {
        for failure in &result.failures {
            callback(format!("[!]  Failed to fetch {}: {}", failure.url, failure.error));
        }
    }

    Ok(result)
}

/// Generate a human-readable summary of a finished crawl
pub fn generate_crawl_summary(result: &CrawlResult) -> String {
    let graph = &result.graph;

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seeds: {}\n", result.seeds.len()));
    report.push_str(&format!("  Max depth: {}\n", result.max_depth));
    report.push_str(&format!("  Pages mapped: {}\n", result.pages_fetched()));
    report.push_str(&format!("  Pages failed: {}\n", result.pages_failed()));
    report.push_str(&format!("  Total edges: {}\n", graph.edge_count()));

    for kind in ReferenceKind::ALL {
        report.push_str(&format!(
            "    <{}> {}\n",
            kind.tag(),
            graph.count_by_kind(kind)
        ));
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group mapped pages by host, first-seen order
    let mut by_host: IndexMap<String, Vec<&str>> = IndexMap::new();
    for source in graph.sources() {
        by_host.entry(extract_host(source)).or_default().push(source);
    }

    for (host, sources) in &by_host {
        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} pages mapped\n\n", sources.len()));

        for source in sources {
            let edges = graph.references(source).map(|refs| refs.len()).unwrap_or(0);
            report.push_str(&format!(
                "  {} {} {}\n",
                "✓".green(),
                extract_url_path(source),
                format!("({} edges)", edges).bright_black()
            ));
        }
        report.push('\n');
    }

    if !result.failures.is_empty() {
        report.push_str("## Failed\n");
        for failure in &result.failures {
            report.push_str(&format!(
                "  {} {} {}\n",
                "✗".red(),
                failure.url,
                failure.error.yellow()
            ));
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_seed_urls_joins_paths() {
        let paths = vec![
            "/blog".to_string(),
            "/portfolio".to_string(),
            "/restaurant".to_string(),
        ];
        assert_eq!(
            build_seed_urls("http://127.0.0.1:5000/", &paths),
            vec![
                "http://127.0.0.1:5000/blog",
                "http://127.0.0.1:5000/portfolio",
                "http://127.0.0.1:5000/restaurant",
            ]
        );
    }

    #[test]
    fn test_build_seed_urls_without_paths() {
        assert_eq!(build_seed_urls("https://x/", &[]), vec!["https://x/"]);
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(extract_host("https://api.example.com/v1"), "api.example.com");
        assert_eq!(extract_host("mailto:someone@example.com"), "unknown");
    }
}
