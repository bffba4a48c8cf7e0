use crate::state::PageDescriptor;
use crate::url::{canonicalize, netloc_of, SeedScope};
use std::collections::HashSet;
use url::Url;

/// Result of reconciling one HEAD-validated page with the crawl state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Added to the visited set; the page takes part in the next GET phase
    Accepted(PageDescriptor),
    /// The page redirected outside the crawl scope
    OutOfScope,
    /// The final URL was already visited
    Duplicate,
}

/// Per-crawl mutable context, owned by exactly one walker
///
/// The visited set only grows and never holds two pages with the same URL.
/// `domain` and `netloc` change at most once, when the seed itself redirects.
#[derive(Debug)]
pub struct CrawlState {
    domain: String,
    netloc: String,
    visited: HashSet<PageDescriptor>,
    level: u32,
}

impl CrawlState {
    pub fn new(scope: SeedScope) -> Self {
        Self {
            domain: scope.domain,
            netloc: scope.netloc,
            visited: HashSet::new(),
            level: 0,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn netloc(&self) -> &str {
        &self.netloc
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn visited(&self) -> &HashSet<PageDescriptor> {
        &self.visited
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
    }

    pub fn into_visited(self) -> HashSet<PageDescriptor> {
        self.visited
    }

    /// Reconciles a HEAD result for `requested` with the visited set
    ///
    /// # Rules
    ///
    /// 1. When the page was reached through a redirect at level 0, the crawl
    ///    is retargeted to the host of the final URL
    /// 2. A redirected page is canonicalized again against the (possibly new)
    ///    domain, excluding the root everywhere but level 0
    /// 3. A final URL already in the visited set is a duplicate
    pub fn admit(&mut self, requested: &str, page: PageDescriptor) -> Admission {
        let mut page = page;

        if page.url() != requested {
            if self.level == 0 {
                self.retarget(page.url());
            }

            let exclude_root = self.level != 0;
            match canonicalize(page.url(), &self.domain, &self.netloc, exclude_root) {
                Some(url) => page = page.relocated(url),
                None => {
                    tracing::debug!(
                        "SKIP {}: redirected out of scope to {}",
                        requested,
                        page.url()
                    );
                    return Admission::OutOfScope;
                }
            }
        }

        if self.visited.contains(page.url()) {
            return Admission::Duplicate;
        }

        self.visited.insert(page.clone());
        Admission::Accepted(page)
    }

    fn retarget(&mut self, final_url: &str) {
        let Ok(url) = Url::parse(final_url) else {
            return;
        };
        let Some(netloc) = netloc_of(&url) else {
            return;
        };

        let domain = format!("{}://{}", url.scheme(), netloc);
        if domain != self.domain {
            tracing::info!("Seed redirected: crawl domain {} -> {}", self.domain, domain);
        }
        self.domain = domain;
        self.netloc = netloc;
    }
}
