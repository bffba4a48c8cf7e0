//! Page records produced by the crawl
//!
//! This module defines the descriptor of an accepted page and the reasons a
//! candidate URL can be skipped.

use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// A crawled page accepted into the sitemap
///
/// Identity is the URL alone: two descriptors with the same URL are equal and
/// hash identically whatever their `last_modified`. Because the descriptor
/// also borrows as `str`, a `HashSet<PageDescriptor>` can be queried directly
/// with a URL string.
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    url: String,
    last_modified: Option<DateTime<Utc>>,
}

impl PageDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Same page metadata under another URL
    pub(crate) fn relocated(self, url: String) -> Self {
        Self { url, ..self }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// The `lastmod` value of the sitemap entry (`YYYY-MM-DD`)
    pub fn lastmod(&self) -> Option<String> {
        self.last_modified
            .map(|date| date.format("%Y-%m-%d").to_string())
    }
}

impl PartialEq for PageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for PageDescriptor {}

impl Hash for PageDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl Ord for PageDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.url.cmp(&other.url)
    }
}

impl PartialOrd for PageDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Borrow<str> for PageDescriptor {
    fn borrow(&self) -> &str {
        &self.url
    }
}

/// Why a candidate URL contributes nothing to the sitemap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Every attempt failed at the transport level (timeout, connection, DNS)
    #[error("request failed: timeout, connection or DNS error")]
    RequestFailed,

    #[error("status code {0} unsupported")]
    UnsupportedStatus(u16),

    #[error("no Content-Type header")]
    MissingContentType,

    #[error("Content-Type '{0}' unsupported")]
    UnsupportedContentType(String),
}

impl SkipReason {
    /// Short stable label, used as a statistics key
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestFailed => "request_failed",
            Self::UnsupportedStatus(_) => "unsupported_status",
            Self::MissingContentType => "missing_content_type",
            Self::UnsupportedContentType(_) => "unsupported_content_type",
        }
    }
}
