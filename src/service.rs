//! Request-level entry point: one crawl request in, one sitemap file out
//!
//! The service validates the request, runs the crawl, writes the sitemap under
//! a random file name and hands the file to the cleanup janitor.

use crate::cleanup::{CleanupEntry, CleanupQueue};
use crate::config::Config;
use crate::crawler::crawl;
use crate::output::SitemapEmitter;
use crate::state::CrawlStats;
use crate::url::{is_valid_url, seed_scope};
use crate::{Result, SitemapError};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Length of the random part of generated file names
const FILE_NAME_LEN: usize = 12;

/// A request to map one site
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlRequest {
    pub url: Option<String>,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// Result of a crawl request, serialized with a `status` tag
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CrawlResponse {
    Ok {
        /// Where the sitemap was written
        file_path: String,
        /// Public URL of the sitemap
        url: String,
        /// Seconds until the file is removed
        retention_seconds: u64,
        /// Number of pages in the sitemap
        pages: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        seed_skip: Option<String>,
        stats: CrawlStats,
    },
    Error {
        message: String,
    },
}

impl CrawlResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, CrawlResponse::Ok { .. })
    }
}

/// Runs crawl requests against a shared configuration and cleanup queue
#[derive(Debug, Clone)]
pub struct SitemapService {
    config: Arc<Config>,
    cleanup: CleanupQueue,
    emitter: SitemapEmitter,
}

impl SitemapService {
    /// Creates the service and starts its cleanup janitor
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: Config) -> Self {
        let cleanup = CleanupQueue::spawn(config.output.queue_size, config.output.retention());
        Self::with_cleanup(config, cleanup)
    }

    pub fn with_cleanup(config: Config, cleanup: CleanupQueue) -> Self {
        let emitter = SitemapEmitter::new(config.output.sitemap_entry_limit);
        Self {
            config: Arc::new(config),
            cleanup,
            emitter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handles a request, turning every failure into an error response
    pub async fn generate(&self, request: CrawlRequest) -> CrawlResponse {
        match self.try_generate(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Sitemap generation failed: {}", e);
                CrawlResponse::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Handles a request
    ///
    /// # Errors
    ///
    /// * `QueueFull` - Too many generated files are waiting for removal. The
    ///   queue slot is taken before crawling, so a request that gets past
    ///   this check always hands its file to the janitor
    /// * `MissingUrl` / `InvalidUrl` - The request has no usable seed URL
    /// * `Output` / `Io` - The sitemap could not be written
    ///
    /// An unreachable seed is not an error: the response is ok, carries the
    /// skip reason and points at an empty sitemap.
    pub async fn try_generate(&self, request: CrawlRequest) -> Result<CrawlResponse> {
        let slot = self.cleanup.reserve()?;

        let url = request
            .url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(SitemapError::MissingUrl)?;
        if !is_valid_url(&url) {
            return Err(SitemapError::InvalidUrl(url));
        }
        let scope = seed_scope(&url).map_err(|_| SitemapError::InvalidUrl(url.clone()))?;

        let output = &self.config.output;
        tokio::fs::create_dir_all(&output.directory).await?;

        let outcome = crawl(scope, &self.config).await?;
        let pages = outcome.visited.len();

        let file_name = random_file_name();
        let base_path = output.directory.join(&file_name);
        let emitter = self.emitter.clone();
        let domain = outcome.domain;
        let visited = outcome.visited;
        let path: PathBuf =
            tokio::task::spawn_blocking(move || emitter.emit(&visited, &domain, &base_path))
                .await
                .map_err(|e| SitemapError::Io(std::io::Error::other(e)))??;

        slot.schedule(CleanupEntry::new(path.clone()));

        let published_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(file_name);

        Ok(CrawlResponse::Ok {
            file_path: path.display().to_string(),
            url: format!("{}{}", output.public_prefix, published_name),
            retention_seconds: output.retention_seconds,
            pages,
            seed_skip: outcome.seed_skip.map(|reason| reason.to_string()),
            stats: outcome.stats,
        })
    }
}

fn random_file_name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FILE_NAME_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_in(dir: &TempDir, queue_size: usize) -> SitemapService {
        let mut config = Config::default();
        config.output.directory = dir.path().to_path_buf();
        config.output.queue_size = queue_size;
        SitemapService::new(config)
    }

    #[test]
    fn test_random_file_name() {
        let name = random_file_name();
        assert_eq!(name.len(), FILE_NAME_LEN);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(name, random_file_name());
    }

    #[tokio::test]
    async fn test_missing_url() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, 4);

        let result = service.try_generate(CrawlRequest::default()).await;
        assert!(matches!(result, Err(SitemapError::MissingUrl)));

        let result = service.try_generate(CrawlRequest::new("   ")).await;
        assert!(matches!(result, Err(SitemapError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, 4);

        let result = service.try_generate(CrawlRequest::new("ftp://example.com")).await;
        assert!(matches!(result, Err(SitemapError::InvalidUrl(url)) if url == "ftp://example.com"));
    }

    #[tokio::test]
    async fn test_error_response() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir, 4);

        let response = service.generate(CrawlRequest::default()).await;
        assert!(!response.is_ok());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Please specify URL");
    }

    #[tokio::test]
    async fn test_full_queue_refuses_work() {
        let dir = TempDir::new().unwrap();
        let (cleanup, _rx) = CleanupQueue::channel(1);
        cleanup
            .schedule(CleanupEntry::new(dir.path().join("pending.xml")))
            .unwrap();

        let mut config = Config::default();
        config.output.directory = dir.path().to_path_buf();
        let service = SitemapService::with_cleanup(config, cleanup);

        let result = service.try_generate(CrawlRequest::new("https://example.com")).await;
        assert!(matches!(result, Err(SitemapError::QueueFull)));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_queue_capacity() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (cleanup, mut rx) = CleanupQueue::channel(1);
        let mut config = Config::default();
        config.crawler.max_depth = 0;
        config.output.directory = dir.path().to_path_buf();
        let service = SitemapService::with_cleanup(config, cleanup);

        let (a, b) = tokio::join!(
            service.try_generate(CrawlRequest::new(server.uri())),
            service.try_generate(CrawlRequest::new(server.uri())),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(SitemapError::QueueFull))));

        // Only the accepted request wrote a file, and that file was queued
        let written: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(written.len(), 1);
        assert_eq!(rx.recv().await.unwrap().path, written[0]);
    }

    #[test]
    fn test_ok_response_serialization() {
        let response = CrawlResponse::Ok {
            file_path: "xml/AbCdEfGh1234.xml".to_string(),
            url: "/xml/AbCdEfGh1234.xml".to_string(),
            retention_seconds: 1800,
            pages: 3,
            seed_skip: None,
            stats: CrawlStats::default(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["url"], "/xml/AbCdEfGh1234.xml");
        assert_eq!(json["pages"], 3);
        assert!(json.get("seed_skip").is_none());
    }
}
