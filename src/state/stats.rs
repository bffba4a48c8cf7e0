use crate::state::SkipReason;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters kept by the walker over one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Number of levels whose HEAD phase ran
    pub levels: u32,

    /// HEAD validations launched
    pub head_requests: usize,

    /// GET link extractions launched
    pub get_requests: usize,

    /// Pages added to the visited set
    pub accepted: usize,

    /// Skipped URLs, keyed by [`SkipReason::kind`]
    pub skipped: BTreeMap<&'static str, usize>,

    /// Redirect targets already visited
    pub duplicates: usize,

    /// Pages that redirected out of the crawl scope
    pub out_of_scope: usize,

    /// Distinct in-scope links found across all GET phases
    pub links_discovered: usize,
}

impl CrawlStats {
    pub fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.kind()).or_insert(0) += 1;
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_skip_groups_by_kind() {
        let mut stats = CrawlStats::default();
        stats.record_skip(&SkipReason::UnsupportedStatus(404));
        stats.record_skip(&SkipReason::UnsupportedStatus(500));
        stats.record_skip(&SkipReason::RequestFailed);

        assert_eq!(stats.skipped.get("unsupported_status"), Some(&2));
        assert_eq!(stats.skipped.get("request_failed"), Some(&1));
        assert_eq!(stats.total_skipped(), 3);
    }
}
