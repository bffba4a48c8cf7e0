//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeout and retry logic
//! - HTML parsing and link extraction
//! - Concurrency-bounded execution of request phases
//! - Breadth-first, level-by-level crawl coordination

mod executor;
mod fetcher;
mod parser;
mod walker;

pub use executor::{BatchExecutor, DEFAULT_LIMIT};
pub use fetcher::{build_http_client, Fetcher};
pub use parser::extract_hrefs;
pub use walker::{CrawlOutcome, SitemapWalker, DEFAULT_DEPTH};

pub use crate::state::SkipReason;

use crate::config::Config;
use crate::url::SeedScope;
use crate::Result;

/// Runs a complete crawl of the site described by `scope`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and fetcher
/// 2. Create the shared concurrency limit
/// 3. Walk the site breadth-first up to `config.crawler.max_depth`
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed; it may contain no pages at all
/// * `Err(SitemapError)` - The HTTP client could not be built
pub async fn crawl(scope: SeedScope, config: &Config) -> Result<CrawlOutcome> {
    let fetcher = Fetcher::from_config(&config.crawler, &config.user_agent)?;
    let executor = BatchExecutor::new(config.crawler.max_concurrent_requests);
    let walker = SitemapWalker::new(scope, fetcher, executor, config.crawler.max_depth);
    Ok(walker.traverse().await)
}
