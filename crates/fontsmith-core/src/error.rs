//! Error types for atlas generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating or saving a font atlas.
///
/// Per-glyph problems (a glyph too large for a page, an unsupported kerning
/// subtable) are not errors; they are counted in
/// [`GenerationStats`](crate::GenerationStats) and logged instead.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// The font file could not be read or parsed.
    #[error("failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    /// Generation parameters were rejected before any work started.
    #[error("invalid generation parameters: {0}")]
    InvalidParams(String),

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding or writing a page image failed.
    #[error("failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A configuration value could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AtlasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;
