use regex::Regex;
use std::sync::LazyLock;

/// `http(s)://` + host (domain name, `localhost` or dotted IPv4) + optional
/// port + optional path/query
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("URL pattern is a valid regex")
});

/// Checks whether a string is an absolute `http`/`https` URL with a
/// syntactically valid host
///
/// Scheme and host are matched case-insensitively. Anything after the host
/// and port must start with `/` or `?` and contain no whitespace.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page?id=1"));
/// assert!(is_valid_url("http://localhost:8080/"));
/// assert!(!is_valid_url("ftp://example.com/"));
/// assert!(!is_valid_url("https://example/"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}
