//! Breadth-first site walker
//!
//! # Algorithm
//!
//! 1. `this_level` starts as the seed domain URL, level 0
//! 2. HEAD-validate every URL of `this_level` that is not yet visited
//! 3. Reconcile the results one by one against the crawl state (redirect
//!    retargeting, scoping, dedupe) and collect the accepted pages
//! 4. Stop once the configured depth is reached
//! 5. GET every accepted page and collect its in-scope links into `next_level`
//! 6. `this_level = next_level`, next level, back to 2
//!
//! Network work only happens inside executor runs; the crawl state is touched
//! exclusively between them.

use crate::crawler::executor::BatchExecutor;
use crate::crawler::fetcher::Fetcher;
use crate::state::{Admission, CrawlState, CrawlStats, PageDescriptor, SkipReason};
use crate::url::SeedScope;
use std::collections::HashSet;
use std::time::Instant;

/// Default number of link-expansion levels below the seed
pub const DEFAULT_DEPTH: u32 = 3;

/// What a finished crawl hands to the emitter and the caller
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Every accepted page
    pub visited: HashSet<PageDescriptor>,

    /// Crawl domain at the end of the walk (after a possible seed redirect)
    pub domain: String,

    pub stats: CrawlStats,

    /// Why the seed itself was rejected, if it was
    pub seed_skip: Option<SkipReason>,
}

/// Walks one site breadth-first, level by level
pub struct SitemapWalker {
    fetcher: Fetcher,
    executor: BatchExecutor,
    depth: u32,
    state: CrawlState,
    stats: CrawlStats,
    seed_skip: Option<SkipReason>,
}

impl SitemapWalker {
    pub fn new(scope: SeedScope, fetcher: Fetcher, executor: BatchExecutor, depth: u32) -> Self {
        Self {
            fetcher,
            executor,
            depth,
            state: CrawlState::new(scope),
            stats: CrawlStats::default(),
            seed_skip: None,
        }
    }

    /// Runs the crawl to completion
    ///
    /// Per-URL failures never surface here; they only shrink the result.
    pub async fn traverse(mut self) -> CrawlOutcome {
        let start_time = Instant::now();
        let mut this_level: HashSet<String> = HashSet::from([self.state.domain().to_string()]);

        tracing::info!(
            "Crawling {} (depth {}, {} concurrent requests)",
            self.state.domain(),
            self.depth,
            self.executor.limit()
        );

        while !this_level.is_empty() {
            let accepted = self.head_phase(this_level).await;

            if self.state.level() >= self.depth {
                break;
            }

            this_level = self.get_phase(&accepted).await;
            self.state.advance_level();
        }

        tracing::info!(
            "Crawl of {} finished: {} pages, {} skipped, {} levels in {:?}",
            self.state.domain(),
            self.state.visited().len(),
            self.stats.total_skipped(),
            self.stats.levels,
            start_time.elapsed()
        );

        let domain = self.state.domain().to_string();
        CrawlOutcome {
            visited: self.state.into_visited(),
            domain,
            stats: self.stats,
            seed_skip: self.seed_skip,
        }
    }

    /// HEAD-validates the unvisited URLs of the current level
    async fn head_phase(&mut self, this_level: HashSet<String>) -> Vec<PageDescriptor> {
        let level = self.state.level();
        let candidates: Vec<String> = this_level
            .into_iter()
            .filter(|url| !self.state.is_visited(url))
            .collect();

        self.stats.levels += 1;
        self.stats.head_requests += candidates.len();
        tracing::info!("Level {}: validating {} URLs", level, candidates.len());

        let fetcher = &self.fetcher;
        let results = self
            .executor
            .run(candidates, |url| async move {
                let result = fetcher.prepare_head(&url).await;
                (url, result)
            })
            .await;

        let mut accepted = Vec::new();
        for (requested, result) in results {
            match result {
                Ok(page) => match self.state.admit(&requested, page) {
                    Admission::Accepted(page) => accepted.push(page),
                    Admission::OutOfScope => self.stats.out_of_scope += 1,
                    Admission::Duplicate => self.stats.duplicates += 1,
                },
                Err(reason) => {
                    tracing::debug!("SKIP {}: {}", requested, reason);
                    self.stats.record_skip(&reason);
                    if level == 0 {
                        tracing::warn!("Seed {} rejected: {}", requested, reason);
                        self.seed_skip = Some(reason);
                    }
                }
            }
        }

        self.stats.accepted += accepted.len();
        tracing::info!("Level {}: accepted {} pages", level, accepted.len());
        accepted
    }

    /// Fetches the accepted pages and gathers the next level's URLs
    async fn get_phase(&mut self, accepted: &[PageDescriptor]) -> HashSet<String> {
        self.stats.get_requests += accepted.len();

        let fetcher = &self.fetcher;
        let domain = self.state.domain();
        let netloc = self.state.netloc();
        let link_sets = self
            .executor
            .run(accepted, |page| fetcher.fetch_links(page, domain, netloc))
            .await;

        let next_level: HashSet<String> = link_sets.into_iter().flatten().collect();
        self.stats.links_discovered += next_level.len();
        next_level
    }
}
