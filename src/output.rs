//! Output blob, its suggested filename, and the hand-off to the host.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Finished document bytes plus the name to offer for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlob {
    pub bytes: Vec<u8>,
    pub filename: String,
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lowercase ASCII slug; runs of anything else collapse into one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// `report-<client-slug>-<yyyy-MM-dd>.pdf`
pub fn suggested_filename(client_name: &str, date: NaiveDate) -> String {
    let slug = slugify(client_name);
    let slug = if slug.is_empty() { "client" } else { slug.as_str() };
    format!("report-{}-{}.pdf", slug, date.format("%Y-%m-%d"))
}

/// Whatever environment receives the finished file.
pub trait DownloadHost {
    fn deliver(&self, bytes: &[u8], filename: &str) -> Result<(), DownloadError>;
}

/// Saves downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    root: PathBuf,
}

impl DirectoryHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryHost { root: root.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}

impl DownloadHost for DirectoryHost {
    fn deliver(&self, bytes: &[u8], filename: &str) -> Result<(), DownloadError> {
        let name = Path::new(filename);
        if filename.is_empty() || name.file_name().map(|n| n != name.as_os_str()).unwrap_or(true) {
            return Err(DownloadError::InvalidFilename(filename.to_string()));
        }
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(filename), bytes)?;
        Ok(())
    }
}

/// Pass the blob through to the host unchanged.
pub fn download<H>(host: &H, blob: &ReportBlob) -> Result<(), DownloadError>
where
    H: DownloadHost + ?Sized,
{
    host.deliver(&blob.bytes, &blob.filename)?;
    info!(filename = %blob.filename, bytes = blob.bytes.len(), "report handed to host");
    Ok(())
}
