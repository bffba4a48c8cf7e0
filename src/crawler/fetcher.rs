//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent and cache headers
//! - Per-attempt timeouts and sequential retries on transport failures
//! - HEAD validation of candidate pages
//! - GET requests feeding link extraction

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::extract_hrefs;
use crate::state::{PageDescriptor, SkipReason};
use crate::url::canonicalize;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::{
    HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, LAST_MODIFIED, PRAGMA,
};
use reqwest::{redirect::Policy, Client, Method, Response, StatusCode};
use std::collections::HashSet;
use std::time::Duration;

/// Maximum number of redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed automatically, so every response carries the final
/// URL of its redirect chain.
///
/// # Example
///
/// ```no_run
/// use sitemap_ripple::config::UserAgentConfig;
/// use sitemap_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("-1"));

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues requests for the crawl with a per-attempt timeout and bounded retries
///
/// A `Fetcher` never returns an error: a URL that cannot be fetched is
/// reported as `None` or as a [`SkipReason`] and simply contributes nothing.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
    attempts: u32,
}

impl Fetcher {
    pub fn new(client: Client, timeout: Duration, attempts: u32) -> Self {
        Self {
            client,
            timeout,
            attempts: attempts.max(1),
        }
    }

    /// Builds a fetcher from the crawler and user agent configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent)?;
        Ok(Self::new(
            client,
            crawler.request_timeout(),
            crawler.request_attempts,
        ))
    }

    /// Performs one request, retrying on transport failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Timeout | Retry, up to `attempts` in total |
    /// | Connection refused / DNS failure | Retry, up to `attempts` in total |
    /// | Any HTTP status | Returned as is, never retried |
    ///
    /// Attempts for one URL run one after another. Returns `None` when every
    /// attempt failed.
    pub async fn fetch(&self, method: Method, url: &str) -> Option<Response> {
        for attempt in 1..=self.attempts {
            let request = self
                .client
                .request(method.clone(), url)
                .timeout(self.timeout);

            match request.send().await {
                Ok(response) => return Some(response),
                Err(e) => {
                    tracing::trace!(
                        "{} {} attempt {}/{} failed: {}",
                        method,
                        url,
                        attempt,
                        self.attempts,
                        e
                    );
                    if e.is_builder() {
                        // Malformed URL: nothing was sent
                        break;
                    }
                }
            }
        }

        None
    }

    /// Validates a candidate page with a HEAD request
    ///
    /// # Request Flow
    ///
    /// 1. HEAD (redirects followed); no response → `RequestFailed`
    /// 2. The descriptor takes the final, post-redirect URL
    /// 3. Status must be 200 → else `UnsupportedStatus`
    /// 4. `Content-Type` must start with `text/html` → else
    ///    `MissingContentType` / `UnsupportedContentType`
    /// 5. A well-formed `Last-Modified` header is attached; a malformed one is
    ///    ignored
    pub async fn prepare_head(&self, url: &str) -> Result<PageDescriptor, SkipReason> {
        let response = self
            .fetch(Method::HEAD, url)
            .await
            .ok_or(SkipReason::RequestFailed)?;

        let final_url = response.url().to_string();

        if response.status() != StatusCode::OK {
            return Err(SkipReason::UnsupportedStatus(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .ok_or(SkipReason::MissingContentType)?
            .to_str()
            .map(str::to_string)
            .map_err(|_| SkipReason::UnsupportedContentType("<non-ascii>".to_string()))?;

        if !is_html(&content_type) {
            return Err(SkipReason::UnsupportedContentType(content_type));
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);

        Ok(PageDescriptor::new(final_url).with_last_modified(last_modified))
    }

    /// Fetches a page and returns the in-scope links it contains
    ///
    /// Every `<a href>` is canonicalized against `domain`/`netloc` with the
    /// domain root excluded. A failed request or unreadable body yields an
    /// empty set.
    pub async fn fetch_links(
        &self,
        page: &PageDescriptor,
        domain: &str,
        netloc: &str,
    ) -> HashSet<String> {
        let Some(response) = self.fetch(Method::GET, page.url()).await else {
            tracing::debug!("SKIP {}: GET failed", page.url());
            return HashSet::new();
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("SKIP {}: unreadable body: {}", page.url(), e);
                return HashSet::new();
            }
        };

        extract_hrefs(&body)
            .iter()
            .filter_map(|href| canonicalize(href, domain, netloc, true))
            .collect()
    }
}

/// `text/html` prefix match, ignoring case and leading whitespace
fn is_html(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/html"))
}

/// Obsolete HTTP-date layouts: RFC 850 and asctime
const OBSOLETE_HTTP_DATE_FORMATS: [&str; 2] =
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// Parses an HTTP-date such as `Wed, 21 Oct 2015 07:28:00 GMT`
///
/// The obsolete forms `Sunday, 06-Nov-94 08:49:37 GMT` and
/// `Sun Nov  6 08:49:37 1994` are accepted too, both read as UTC.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }

    OBSOLETE_HTTP_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|date| date.and_utc())
}
