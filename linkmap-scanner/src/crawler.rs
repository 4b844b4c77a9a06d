use crate::error::{FetchError, Result, ScanError};
use crate::extractor::extract;
use crate::fetcher::{DEFAULT_TIMEOUT_SECS, Fetcher, HttpFetcher, RedirectPolicy};
use crate::frontier::{Frontier, FrontierItem};
use crate::result::{CrawlResult, FailedFetch};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_DEPTH: usize = 1;

/// Called with `(depth, url)` just before each fetch.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub struct Crawler<F: Fetcher = HttpFetcher> {
    fetcher: Arc<F>,
    max_depth: usize,
    workers: usize,
    fetch_timeout: Duration,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler<HttpFetcher> {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS, RedirectPolicy::default())
    }

    pub fn with_timeout(timeout_secs: u64, redirects: RedirectPolicy) -> Result<Self> {
        let fetcher = HttpFetcher::with_settings(timeout_secs, redirects)?;
        Ok(Self::with_fetcher(fetcher).with_fetch_timeout(Duration::from_secs(timeout_secs)))
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            max_depth: DEFAULT_MAX_DEPTH,
            workers: 1,
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Upper bound on fetches in flight at once.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Hard cap on a single fetch, applied on top of whatever the fetcher does.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Crawl breadth-first from `seeds` and return the link graph.
    ///
    /// Each level of the frontier is claimed in FIFO order, fetched with up
    /// to `workers` requests in flight, and applied back in claim order. The
    /// resulting graph is the same as a one-at-a-time crawl would build.
    pub async fn run(&self, seeds: &[String]) -> Result<CrawlResult> {
        if seeds.is_empty() {
            return Err(ScanError::InvalidInput("at least one seed URL is required".to_string()));
        }
        if self.workers == 0 {
            return Err(ScanError::InvalidInput("worker count must be at least 1".to_string()));
        }

        info!(
            "Starting crawl of {} seed(s), max depth {}, {} worker(s)",
            seeds.len(),
            self.max_depth,
            self.workers
        );
        let start = Instant::now();

        let mut result = CrawlResult::new(seeds.to_vec(), self.max_depth);
        let mut frontier = Frontier::new(self.max_depth);
        frontier.seed(seeds.iter().cloned());

        while !frontier.is_empty() {
            let level = frontier.claim_level();
            debug!("Claimed {} URL(s) for the next level", level.len());

            let outcomes: Vec<(FrontierItem, std::result::Result<String, FetchError>)> =
                stream::iter(level)
                    .map(|item| self.fetch_item(item))
                    .buffered(self.workers)
                    .collect()
                    .await;

            for (item, outcome) in outcomes {
                match outcome {
                    Ok(body) => {
                        let references = extract(&item.url, &body);
                        debug!(
                            "[depth {}] {} -> {} reference(s)",
                            item.depth,
                            item.url,
                            references.len()
                        );
                        for reference in &references {
                            frontier.push(&reference.url, item.depth + 1);
                        }
                        result.graph.insert(item.url, references);
                    }
                    Err(e) => {
                        warn!("Fetch failed for {}: {}", item.url, e);
                        result.failures.push(FailedFetch {
                            url: item.url,
                            depth: item.depth,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        result.elapsed = start.elapsed();
        info!(
            "Crawl complete. {} page(s) mapped, {} failed, {} edge(s) in {:?}",
            result.pages_fetched(),
            result.pages_failed(),
            result.graph.edge_count(),
            result.elapsed
        );

        Ok(result)
    }

    async fn fetch_item(
        &self,
        item: FrontierItem,
    ) -> (FrontierItem, std::result::Result<String, FetchError>) {
        if let Some(ref callback) = self.progress_callback {
            callback(item.depth, item.url.clone());
        }

        let outcome = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(&item.url)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Timeout),
        };

        (item, outcome)
    }
}
