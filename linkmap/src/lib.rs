// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CrawlCommand, CrawlOutcome, load_urls_from_file, load_urls_from_source, parse_url_line,
    resolve_output_dir, run_crawl,
};

// Re-export crawl functionality from linkmap-core
pub use linkmap_core::crawl::{
    CrawlOptions, CrawlProgressCallback, build_seed_urls, execute_crawl, extract_url_path,
    generate_crawl_summary,
};
