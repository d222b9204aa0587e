use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Receives a finished document, the way a browser download would.
pub trait DownloadTarget {
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves downloads into a directory. The document is written to a temporary
/// file next to the target and renamed into place, so a failed write never
/// leaves a truncated PDF under the download name.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryTarget {
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory: {}", self.dir.display()))?;
        let path = self.dir.join(file_name);

        debug!("Saving PDF to {}", path.display());
        let staged = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create PDF file in: {}", self.dir.display()))?;
        let mut writer = BufWriter::new(staged);
        writer
            .write_all(bytes)
            .and_then(|_| writer.flush())
            .with_context(|| format!("Failed to save PDF file: {}", path.display()))?;
        let staged = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("Failed to save PDF file: {}", path.display()))?;
        staged
            .persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move PDF into place: {}", path.display()))?;

        let pdf_size = std::fs::metadata(&path)?.len();
        info!("PDF saved successfully. File size: {} bytes", pdf_size);
        Ok(path)
    }
}
