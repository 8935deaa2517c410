//! Branding prelude.
//!
//! The only asynchronous step of a run: the logo is fetched and decoded once,
//! under a timeout, before composition starts. Any failure falls back to a
//! text mark and is reported as a diagnostic.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EngineOptions;
use crate::error::Diagnostic;
use crate::image_embed::{decode_raster, payload_bytes, EmbedError, RasterImage};
use crate::report::ImagePayload;

/// Upper bound on a downloaded logo.
const MAX_LOGO_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("failed to read logo: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode logo: {0}")]
    Decode(#[from] EmbedError),

    #[error("logo not loaded within {0:?}")]
    Timeout(Duration),

    #[error("logo loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Where the logo comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    DataUrl(String),
    Remote(String),
    File(PathBuf),
}

impl LogoSource {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("data:") {
            LogoSource::DataUrl(source.to_string())
        } else if source.starts_with("http://") || source.starts_with("https://") {
            LogoSource::Remote(source.to_string())
        } else {
            LogoSource::File(PathBuf::from(source))
        }
    }
}

/// Brand shown in the header and page chrome.
#[derive(Debug, Clone)]
pub struct Branding {
    pub name: String,
    pub logo: Option<Arc<RasterImage>>,
}

impl Branding {
    /// Text mark only.
    pub fn text(name: impl Into<String>) -> Self {
        Branding {
            name: name.into(),
            logo: None,
        }
    }
}

fn fetch_remote(url: &str, timeout: Duration) -> Result<Vec<u8>, AssetError> {
    let response = ureq::get(url)
        .timeout(timeout)
        .call()
        .map_err(|e| AssetError::Http(e.to_string()))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_LOGO_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

async fn fetch_bytes(source: &LogoSource, timeout: Duration) -> Result<Vec<u8>, AssetError> {
    match source {
        LogoSource::DataUrl(url) => Ok(payload_bytes(&ImagePayload::new(url.clone()))?),
        LogoSource::Remote(url) => {
            let url = url.clone();
            // ureq blocks; keep it off the runtime threads.
            tokio::task::spawn_blocking(move || fetch_remote(&url, timeout)).await?
        }
        LogoSource::File(path) => Ok(tokio::fs::read(path).await?),
    }
}

/// Fetch and decode the logo, giving up after `timeout`.
pub async fn load_logo(source: &LogoSource, timeout: Duration) -> Result<RasterImage, AssetError> {
    let bytes = tokio::time::timeout(timeout, fetch_bytes(source, timeout))
        .await
        .map_err(|_| AssetError::Timeout(timeout))??;
    Ok(decode_raster(&bytes)?)
}

/// Resolve the branding for a run. Never fails: without a usable logo the
/// brand name is drawn as text.
pub async fn load_branding(options: &EngineOptions) -> (Branding, Vec<Diagnostic>) {
    let mut branding = Branding::text(options.brand_name.clone());
    let Some(source) = &options.logo else {
        return (branding, Vec::new());
    };

    match load_logo(source, options.logo_timeout).await {
        Ok(logo) => {
            debug!(width = logo.width, height = logo.height, "logo loaded");
            branding.logo = Some(Arc::new(logo));
            (branding, Vec::new())
        }
        Err(err) => {
            warn!(error = %err, "logo unavailable, using text mark");
            let diagnostic = Diagnostic::AssetLoadFailure {
                reason: err.to_string(),
            };
            (branding, vec![diagnostic])
        }
    }
}
