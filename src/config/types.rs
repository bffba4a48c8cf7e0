use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sitemap-Ripple
///
/// Every section and key is optional; missing values take the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of HEAD-validation levels below the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Number of attempts for a request failing at the transport level
    #[serde(rename = "request-attempts")]
    pub request_attempts: u32,

    /// Maximum number of requests in flight at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            request_timeout: 8,
            request_attempts: 3,
            max_concurrent_requests: 64,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SitemapRipple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://www.sitemaps.org/protocol.html".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives generated sitemap files
    pub directory: PathBuf,

    /// URL prefix under which generated files are published
    #[serde(rename = "public-prefix")]
    pub public_prefix: String,

    /// Maximum number of `url` entries in one sitemap file
    #[serde(rename = "sitemap-entry-limit")]
    pub sitemap_entry_limit: usize,

    /// How long generated files are kept before the janitor removes them (seconds)
    #[serde(rename = "retention-seconds")]
    pub retention_seconds: u64,

    /// Capacity of the cleanup queue; generation is refused while it is full
    #[serde(rename = "queue-size")]
    pub queue_size: usize,
}

impl OutputConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_seconds)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("xml/"),
            public_prefix: "/xml/".to_string(),
            sitemap_entry_limit: 50_000,
            retention_seconds: 30 * 60,
            queue_size: 1024,
        }
    }
}
