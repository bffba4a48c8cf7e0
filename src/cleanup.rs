//! Deferred removal of generated sitemap files
//!
//! Every generated file is handed to a background janitor together with its
//! creation time. The janitor works through the queue in order and deletes
//! each file once the retention period has passed. The queue is bounded; when
//! it is full no new sitemap may be generated.

use crate::SitemapError;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// A generated file waiting for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupEntry {
    pub created_at: DateTime<Utc>,
    pub path: PathBuf,
}

impl CleanupEntry {
    pub fn new(path: PathBuf) -> Self {
        Self {
            created_at: Utc::now(),
            path,
        }
    }
}

/// Sending side of the cleanup queue
#[derive(Debug, Clone)]
pub struct CleanupQueue {
    tx: mpsc::Sender<CleanupEntry>,
}

impl CleanupQueue {
    /// Creates the queue and spawns its janitor on the current tokio runtime
    pub fn spawn(capacity: usize, retention: Duration) -> Self {
        let (queue, rx) = Self::channel(capacity);
        tokio::spawn(run_janitor(rx, retention));
        queue
    }

    pub(crate) fn channel(capacity: usize) -> (Self, mpsc::Receiver<CleanupEntry>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Whether a new entry would be refused right now
    pub fn is_full(&self) -> bool {
        self.tx.capacity() == 0
    }

    /// Takes a queue slot without waiting
    ///
    /// The slot is held until [`CleanupSlot::schedule`] fills it or it is
    /// dropped, so work started under a reservation is never refused at the
    /// end.
    pub fn reserve(&self) -> Result<CleanupSlot<'_>, SitemapError> {
        match self.tx.try_reserve() {
            Ok(permit) => Ok(CleanupSlot {
                permit: Some(permit),
            }),
            Err(TrySendError::Full(())) => Err(SitemapError::QueueFull),
            Err(TrySendError::Closed(())) => {
                tracing::warn!("Cleanup janitor is not running; generated files will be kept");
                Ok(CleanupSlot { permit: None })
            }
        }
    }

    /// Queues `entry` for removal without waiting
    pub fn schedule(&self, entry: CleanupEntry) -> Result<(), SitemapError> {
        self.reserve()?.schedule(entry);
        Ok(())
    }
}

/// A reserved place in the cleanup queue
#[derive(Debug)]
pub struct CleanupSlot<'a> {
    permit: Option<mpsc::Permit<'a, CleanupEntry>>,
}

impl CleanupSlot<'_> {
    pub fn schedule(self, entry: CleanupEntry) {
        match self.permit {
            Some(permit) => permit.send(entry),
            None => tracing::warn!("{} will be kept", entry.path.display()),
        }
    }
}

/// Deletes queued files once they are older than `retention`
async fn run_janitor(mut rx: mpsc::Receiver<CleanupEntry>, retention: Duration) {
    while let Some(entry) = rx.recv().await {
        let age = (Utc::now() - entry.created_at).to_std().unwrap_or_default();
        let remaining = retention.saturating_sub(age);
        if !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }

        match tokio::fs::remove_file(&entry.path).await {
            Ok(()) => tracing::debug!("Removed expired sitemap {}", entry.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", entry.path.display(), e),
        }
    }
    tracing::debug!("Cleanup queue closed, janitor stopping");
}

/// Removes leftover `.xml` and `.zip` files from the output directory
///
/// Returns how many files were removed. A missing directory counts as empty.
pub fn purge_output_dir(dir: &Path) -> io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        let is_sitemap = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == "xml" || ext == "zip");
        if is_sitemap {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }

    tracing::info!("Purged {} files from {}", removed, dir.display());
    Ok(removed)
}
