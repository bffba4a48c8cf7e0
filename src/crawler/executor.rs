//! Concurrency-bounded execution of crawl operations
//!
//! One counting semaphore is shared by every phase of a crawl, so at most
//! `limit` requests are in flight at any moment whatever the number of items.
//! [`BatchExecutor::run`] returns only once every operation it launched has
//! settled, which is the barrier between the HEAD and GET phases and between
//! BFS levels.

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of concurrently outstanding requests
pub const DEFAULT_LIMIT: usize = 64;

/// Runs groups of operations with a hard cap on concurrent ones
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl BatchExecutor {
    /// Creates an executor allowing `limit` operations in flight (at least one)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `handler` once per item and waits for all of them
    ///
    /// Each operation holds a permit for its whole duration. Failures are
    /// part of `T`, so one failing item never cancels the others. Results are
    /// returned in item order.
    pub async fn run<I, F, Fut, T>(&self, items: I, handler: F) -> Vec<T>
    where
        I: IntoIterator,
        F: Fn(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        let handler = &handler;
        let operations = items.into_iter().map(|item| async move {
            match self.permits.acquire().await {
                Ok(_permit) => Some(handler(item).await),
                Err(_) => None,
            }
        });

        join_all(operations).await.into_iter().flatten().collect()
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}
