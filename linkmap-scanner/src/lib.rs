pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod frontier;
pub mod graph;
pub mod resolver;
pub mod result;

pub use crawler::{Crawler, ProgressCallback};
pub use error::{FetchError, ScanError};
pub use extractor::{Reference, ReferenceKind, extract};
pub use fetcher::{Fetcher, HttpFetcher, RedirectPolicy};
pub use frontier::{Frontier, FrontierItem};
pub use graph::{Edge, EdgeRow, SiteGraph};
pub use resolver::resolve;
pub use result::{CrawlResult, FailedFetch};
