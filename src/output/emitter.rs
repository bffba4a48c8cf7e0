use crate::output::archive::SitemapArchive;
use crate::output::xml::{write_sitemap_index, write_urlset};
use crate::output::OutputError;
use crate::state::PageDescriptor;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default number of `url` entries per sitemap file (the protocol maximum)
pub const DEFAULT_ENTRY_LIMIT: usize = 50_000;

/// Turns the pages of a crawl into sitemap files
#[derive(Debug, Clone)]
pub struct SitemapEmitter {
    entry_limit: usize,
}

impl SitemapEmitter {
    pub fn new(entry_limit: usize) -> Self {
        Self {
            entry_limit: entry_limit.max(1),
        }
    }

    /// Writes the sitemap for `pages` next to `base_path` and returns its path
    ///
    /// # Output
    ///
    /// - Up to `entry_limit` pages: a single `<base_path>.xml` urlset
    /// - More: `<base_path>.zip` containing `sitemap0.xml`, `sitemap1.xml`, …
    ///   (at most `entry_limit` entries each) and a `<base name>.xml`
    ///   sitemap index pointing at `<domain>/sitemapN.xml`
    ///
    /// Entries are ordered by URL. On failure every file created by this call
    /// is removed.
    pub fn emit(
        &self,
        pages: &HashSet<PageDescriptor>,
        domain: &str,
        base_path: &Path,
    ) -> Result<PathBuf, OutputError> {
        let mut ordered: Vec<&PageDescriptor> = pages.iter().collect();
        ordered.sort();

        let mut created = Vec::new();
        let result = if ordered.len() <= self.entry_limit {
            let path = with_suffix(base_path, ".xml");
            created.push(path.clone());
            write_urlset_file(&path, &ordered).map(|()| path)
        } else {
            self.emit_archive(&ordered, domain, base_path, &mut created)
        };

        match result {
            Ok(path) => {
                tracing::info!(
                    "Sitemap with {} entries written to {}",
                    pages.len(),
                    path.display()
                );
                Ok(path)
            }
            Err(e) => {
                for path in &created {
                    let _ = std::fs::remove_file(path);
                }
                Err(e)
            }
        }
    }

    fn emit_archive(
        &self,
        ordered: &[&PageDescriptor],
        domain: &str,
        base_path: &Path,
        created: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, OutputError> {
        let archive_path = with_suffix(base_path, ".zip");
        created.push(archive_path.clone());
        let mut archive = SitemapArchive::create(&archive_path)?;

        let mut locations = Vec::new();
        for (idx, chunk) in ordered.chunks(self.entry_limit).enumerate() {
            let name = format!("sitemap{}.xml", idx);
            let chunk_path = with_suffix(base_path, &format!(".{}", name));
            created.push(chunk_path.clone());

            write_urlset_file(&chunk_path, chunk)?;
            archive.add_file(&name, &chunk_path)?;
            std::fs::remove_file(&chunk_path)?;

            locations.push(format!("{}/{}", domain.trim_end_matches('/'), name));
        }

        let index_path = with_suffix(base_path, ".xml");
        created.push(index_path.clone());
        let index_name = index_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sitemap_index.xml".to_string());

        let out = write_sitemap_index(BufWriter::new(File::create(&index_path)?), &locations)?;
        finish_file(out)?;
        archive.add_file(&index_name, &index_path)?;
        std::fs::remove_file(&index_path)?;

        tracing::debug!(
            "Archived {} sitemap chunks with index {}",
            locations.len(),
            index_name
        );
        archive.finish()
    }
}

impl Default for SitemapEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_LIMIT)
    }
}

fn write_urlset_file(path: &Path, pages: &[&PageDescriptor]) -> Result<(), OutputError> {
    let out = write_urlset(BufWriter::new(File::create(path)?), pages)?;
    finish_file(out)
}

fn finish_file(mut out: BufWriter<File>) -> Result<(), OutputError> {
    out.flush()?;
    Ok(())
}

/// `base_path` with `suffix` appended to its final component
fn with_suffix(base_path: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base_path.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}
