use thiserror::Error;

use crate::blocks::BlockKind;

/// A run that could not produce a document at all.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("{block} block needs {height:.1}pt but a page only holds {available:.1}pt")]
    Geometry {
        block: BlockKind,
        height: f32,
        available: f32,
    },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Wrap a PDF backend failure.
    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        GenerationError::Pdf(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Something that went wrong without stopping the run.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A photo was replaced by a placeholder.
    ImageEmbedFailure { context: String, reason: String },
    /// The branding asset could not be loaded; a text mark was used.
    AssetLoadFailure { reason: String },
    /// A renderer used a different height than was measured for it.
    LayoutOverflow {
        block: BlockKind,
        measured: f32,
        consumed: f32,
    },
}

impl Diagnostic {
    pub fn is_image_failure(&self) -> bool {
        matches!(self, Diagnostic::ImageEmbedFailure { .. })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::ImageEmbedFailure { context, reason } => {
                write!(f, "image '{}' replaced by placeholder: {}", context, reason)
            }
            Diagnostic::AssetLoadFailure { reason } => {
                write!(f, "branding asset unavailable: {}", reason)
            }
            Diagnostic::LayoutOverflow {
                block,
                measured,
                consumed,
            } => write!(
                f,
                "{} block measured {:.2}pt but consumed {:.2}pt",
                block, measured, consumed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GenerationError::InvalidReport("client name is empty".to_string());
        assert_eq!(err.to_string(), "Invalid report: client name is empty");

        let err = GenerationError::Geometry {
            block: BlockKind::PhotoGrid,
            height: 900.0,
            available: 741.89,
        };
        assert_eq!(
            err.to_string(),
            "photo grid block needs 900.0pt but a page only holds 741.9pt"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: GenerationError = io.into();
        assert!(matches!(err, GenerationError::Io(_)));
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::LayoutOverflow {
            block: BlockKind::RoomCard,
            measured: 38.0,
            consumed: 40.0,
        };
        assert_eq!(d.to_string(), "room card block measured 38.00pt but consumed 40.00pt");
        assert!(!d.is_image_failure());
    }
}
