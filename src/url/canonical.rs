use super::domain::netloc_of;
use super::validate::is_valid_url;
use url::{ParseError, Url};

/// Where an `href` points relative to the crawl scope
enum HrefTarget {
    /// No network location: joined onto the crawl domain
    Relative,
    /// Absolute (or scheme-relative) link carrying this netloc
    Host(String),
    /// Carries a network location that cannot be parsed
    Malformed,
}

fn href_target(href: &str) -> HrefTarget {
    let parsed = if href.starts_with("//") {
        Url::parse(&format!("http:{}", href))
    } else {
        Url::parse(href)
    };

    match parsed {
        Ok(url) => match netloc_of(&url) {
            Some(netloc) => HrefTarget::Host(netloc),
            // mailto:, javascript:, data: and friends
            None => HrefTarget::Relative,
        },
        Err(ParseError::RelativeUrlWithoutBase) => HrefTarget::Relative,
        Err(_) => HrefTarget::Malformed,
    }
}

/// Filters a link found on a page down to an in-scope, fragment-free URL
///
/// # Rules
///
/// - A relative `href` is joined onto `domain` by plain concatenation
/// - An absolute `href` is kept as written when its netloc equals `netloc`
/// - An absolute `href` on any other host is rejected
/// - The result must pass [`is_valid_url`](super::is_valid_url)
/// - Everything from the first `#` is removed
/// - With `exclude_root`, the domain root (with or without trailing slash)
///   is rejected
///
/// Returns `None` for every rejected link.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::canonicalize;
///
/// let domain = "https://example.com";
/// let netloc = "example.com";
///
/// assert_eq!(
///     canonicalize("/about#team", domain, netloc, true),
///     Some("https://example.com/about".to_string())
/// );
/// assert_eq!(canonicalize("https://other.com/", domain, netloc, true), None);
/// assert_eq!(canonicalize("/", domain, netloc, true), None);
/// ```
pub fn canonicalize(href: &str, domain: &str, netloc: &str, exclude_root: bool) -> Option<String> {
    let href = href.trim();

    let joined = match href_target(href) {
        HrefTarget::Relative => format!("{}{}", domain, href),
        HrefTarget::Host(host) if host == netloc => href.to_string(),
        HrefTarget::Host(_) | HrefTarget::Malformed => return None,
    };

    if !is_valid_url(&joined) {
        return None;
    }

    let url = match joined.split_once('#') {
        Some((before, _)) => before,
        None => joined.as_str(),
    };

    if exclude_root && is_domain_root(url, domain) {
        return None;
    }

    Some(url.to_string())
}

fn is_domain_root(url: &str, domain: &str) -> bool {
    let bare = domain.strip_suffix('/').unwrap_or(domain);
    url == bare || url.strip_suffix('/') == Some(bare)
}
