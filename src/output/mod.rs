//! Sitemap output
//!
//! This module handles:
//! - Rendering `urlset` and `sitemapindex` documents
//! - Splitting large crawls into chunks bundled in a zip archive

mod archive;
mod emitter;
mod xml;

pub use archive::SitemapArchive;
pub use emitter::{SitemapEmitter, DEFAULT_ENTRY_LIMIT};
pub use xml::{write_sitemap_index, write_urlset, SITEMAP_NS};

use thiserror::Error;

/// Errors raised while writing sitemap files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}
