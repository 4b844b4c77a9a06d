use crate::graph::SiteGraph;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A URL that was claimed but could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFetch {
    pub url: String,
    pub depth: usize,
    pub error: String,
}

/// Everything one crawl run produces. The graph is final once returned.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    pub seeds: Vec<String>,
    pub max_depth: usize,
    pub graph: SiteGraph,
    pub failures: Vec<FailedFetch>,
    pub elapsed: Duration,
}

impl CrawlResult {
    pub fn new(seeds: Vec<String>, max_depth: usize) -> Self {
        Self {
            seeds,
            max_depth,
            graph: SiteGraph::new(),
            failures: Vec::new(),
            elapsed: Duration::from_secs(0),
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.graph.source_count()
    }

    pub fn pages_failed(&self) -> usize {
        self.failures.len()
    }
}
