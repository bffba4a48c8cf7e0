//! HTML parser for extracting link candidates
//!
//! Only anchor elements are considered; scoping and validation of the
//! extracted values is left to [`canonicalize`](crate::url::canonicalize).

use scraper::{Html, Selector};

/// Extracts the raw `href` value of every `<a>` element carrying one
///
/// Values are returned as written in the document, in document order,
/// duplicates included.
///
/// # Example
///
/// ```
/// use sitemap_ripple::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a name="x">No link</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
