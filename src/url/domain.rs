use crate::{UrlError, UrlResult};
use url::Url;

/// Crawl scope derived from a seed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedScope {
    /// `scheme://netloc`, without a trailing slash
    pub domain: String,
    /// Host plus explicit port, used for same-domain membership checks
    pub netloc: String,
}

/// Renders the network location of a URL: the lowercase host, followed by
/// `:port` when the URL carries a non-default port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_ripple::url::netloc_of;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(netloc_of(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(netloc_of(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn netloc_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Derives the crawl scope (`domain` and `netloc`) from a URL
///
/// Only the scheme and network location are kept; path, query and fragment
/// of the seed are dropped.
pub fn seed_scope(url: &str) -> UrlResult<SeedScope> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }

    let netloc = netloc_of(&parsed).ok_or(UrlError::MissingDomain)?;
    Ok(SeedScope {
        domain: format!("{}://{}", parsed.scheme(), netloc),
        netloc,
    })
}
