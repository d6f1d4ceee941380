//! Error types for render-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for render-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during fidelity evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A ground-truth or candidate root directory is missing or unreadable.
    ///
    /// Unlike per-pair failures, this aborts the whole run.
    #[error("Directory unreadable: {path}: {reason}")]
    Directory {
        /// Path to the directory that could not be read.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to decode an image file.
    #[error("Image load failed: {path}: {reason}")]
    ImageLoad {
        /// Path to the image that failed to decode.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Image dimensions don't match between ground-truth and candidate.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Ground-truth dimensions (width, height).
        expected: (usize, usize),
        /// Candidate dimensions (width, height).
        actual: (usize, usize),
    },

    /// An image cannot be scored at all (zero-sized dimension).
    #[error("Invalid image: {reason}")]
    InvalidImage {
        /// Reason the image is unscorable.
        reason: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
