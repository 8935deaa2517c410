//! Image Embedder.
//!
//! Turns a resolved photo payload into pixels placed inside a rectangle. Any
//! problem with a payload ends in a grey placeholder and a diagnostic, never
//! in an error for the caller: one bad photo must not cost its neighbours.

use std::sync::Arc;

use base64::Engine;
use thiserror::Error;
use tracing::warn;

use crate::canvas::{Frame, Rect};
use crate::error::Diagnostic;
use crate::report::ImagePayload;

/// Longest edge, in pixels, kept for an embedded photo. Phone cameras deliver
/// far more than a 110pt cell can show.
const MAX_EMBED_EDGE: u32 = 1200;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("payload is empty")]
    Empty,

    #[error("malformed data URL")]
    InvalidDataUrl,

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    ZeroSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    /// Identify the format from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Some(RasterFormat::Png)
        } else if bytes.starts_with(&JPEG_SIGNATURE) {
            Some(RasterFormat::Jpeg)
        } else {
            None
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            RasterFormat::Png => image::ImageFormat::Png,
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Decoded RGB8 pixels ready for the PDF writer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedOutcome {
    Embedded,
    Placeholder,
}

/// Raw bytes behind a payload. Accepts `data:<mime>;base64,<data>` or bare
/// base64.
pub fn payload_bytes(payload: &ImagePayload) -> Result<Vec<u8>, EmbedError> {
    let source = payload.as_str().trim();
    if source.is_empty() {
        return Err(EmbedError::Empty);
    }

    let encoded = if let Some(rest) = source.strip_prefix("data:") {
        let (header, data) = rest.split_once(',').ok_or(EmbedError::InvalidDataUrl)?;
        if !header.ends_with(";base64") {
            return Err(EmbedError::InvalidDataUrl);
        }
        data
    } else {
        source
    };

    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    if bytes.is_empty() {
        return Err(EmbedError::Empty);
    }
    Ok(bytes)
}

/// Decode PNG or JPEG bytes into RGB8, downscaling oversized photos.
pub fn decode_raster(bytes: &[u8]) -> Result<RasterImage, EmbedError> {
    let format = RasterFormat::sniff(bytes).ok_or(EmbedError::UnsupportedFormat)?;
    let mut img = image::load_from_memory_with_format(bytes, format.image_format())?;

    if img.width() == 0 || img.height() == 0 {
        return Err(EmbedError::ZeroSize);
    }
    if img.width() > MAX_EMBED_EDGE || img.height() > MAX_EMBED_EDGE {
        img = img.thumbnail(MAX_EMBED_EDGE, MAX_EMBED_EDGE);
    }

    let rgb = img.to_rgb8();
    Ok(RasterImage {
        width: rgb.width(),
        height: rgb.height(),
        rgb: rgb.into_raw(),
    })
}

pub fn decode_payload(payload: &ImagePayload) -> Result<RasterImage, EmbedError> {
    decode_raster(&payload_bytes(payload)?)
}

/// Place `payload` inside `rect` (block-local), preserving aspect ratio.
///
/// On failure a placeholder fills `rect` and a diagnostic naming `context`
/// is recorded.
pub fn embed(
    frame: &mut Frame<'_>,
    payload: &ImagePayload,
    rect: Rect,
    context: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> EmbedOutcome {
    match decode_payload(payload) {
        Ok(image) => {
            place(frame, Arc::new(image), rect);
            EmbedOutcome::Embedded
        }
        Err(err) => {
            warn!(context, error = %err, "image replaced by placeholder");
            diagnostics.push(Diagnostic::ImageEmbedFailure {
                context: context.to_string(),
                reason: err.to_string(),
            });
            frame.placeholder(rect);
            EmbedOutcome::Placeholder
        }
    }
}

/// Place an already decoded image, contain-fitted into `rect`.
pub fn place(frame: &mut Frame<'_>, image: Arc<RasterImage>, rect: Rect) {
    let fitted = rect.fit_contain(image.width as f32, image.height as f32);
    frame.image(fitted, image);
}
