//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageDescriptor`: an accepted page, identified by its URL
//! - `SkipReason`: why a candidate URL was left out
//! - `CrawlState`: domain scope, visited set and current level of one crawl
//! - `CrawlStats`: counters reported at the end of a crawl

mod crawl_state;
mod page;
mod stats;

// Re-export main types
pub use crawl_state::{Admission, CrawlState};
pub use page::{PageDescriptor, SkipReason};
pub use stats::CrawlStats;
