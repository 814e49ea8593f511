//! Error types for loading and saving planner files.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for view I/O operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while reading or writing planner files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl LoadError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create an `InvalidContent` error pointing at a line of a text file.
    #[must_use]
    pub fn at_line(line: usize, message: impl std::fmt::Display) -> Self {
        Self::invalid_content(format!("line {line}: {message}"))
    }

    /// Map an error from opening `path`, turning `NotFound` into [`Self::FileNotFound`].
    #[must_use]
    pub fn open(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(error)
        }
    }

    /// Returns `true` if this is a missing-file error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}
