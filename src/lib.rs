//! Sitemap-Ripple: a bounded-depth site crawler and Sitemap generator
//!
//! This crate walks a web site breadth-first up to a configured link depth,
//! validates every candidate page with a HEAD request, and writes the accepted
//! pages as a Sitemap (or a Sitemap Index packed into a zip archive when the
//! page count exceeds the per-file limit).

pub mod cleanup;
pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Ripple operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Please specify URL")]
    MissingUrl,

    #[error("Incorrect URL specified \"{0}\"")]
    InvalidUrl(String),

    #[error("XML file queue is full, please wait until old files are deleted")]
    QueueFull,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sitemap-Ripple operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{SitemapWalker, SkipReason};
pub use output::SitemapEmitter;
pub use service::{CrawlRequest, CrawlResponse, SitemapService};
pub use state::{CrawlState, PageDescriptor};
pub use url::{canonicalize, is_valid_url};
