use crate::output::OutputError;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip archive bundling sitemap chunks with their index
pub struct SitemapArchive {
    zip: ZipWriter<File>,
    path: PathBuf,
}

impl SitemapArchive {
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        let file = File::create(path)?;
        Ok(Self {
            zip: ZipWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Copies the file at `source` into the archive as `name`
    pub fn add_file(&mut self, name: &str, source: &Path) -> Result<(), OutputError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(name, options)?;

        let mut input = File::open(source)?;
        io::copy(&mut input, &mut self.zip)?;
        Ok(())
    }

    /// Writes the central directory and returns the archive path
    pub fn finish(self) -> Result<PathBuf, OutputError> {
        self.zip.finish()?;
        Ok(self.path)
    }
}
