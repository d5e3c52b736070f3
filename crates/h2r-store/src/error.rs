//! Error types for the histogram store.

use thiserror::Error;

/// Store error type.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while persisting the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A path segment that must be a directory names an existing histogram.
    #[error("'{path}' is a histogram, not a directory")]
    NotADirectory {
        /// Slash-joined path of the offending node.
        path: String,
    },

    /// A histogram would replace an existing directory of the same name.
    #[error("'{path}' is a directory and cannot be replaced by a histogram")]
    NameConflict {
        /// Slash-joined path of the offending node.
        path: String,
    },

    /// A path segment cannot be mapped onto the filesystem.
    #[error("'{path}' cannot be used as a filesystem name")]
    InvalidName {
        /// Slash-joined path of the offending node.
        path: String,
    },

    /// Bin index outside `0..=n_bins + 1`.
    #[error("bin index {index} out of range (histogram has {n_bins} bins)")]
    BinOutOfRange {
        /// Requested bin index.
        index: usize,
        /// Number of ordinary bins.
        n_bins: usize,
    },

    /// Fewer than two bin edges.
    #[error("invalid binning: {0}")]
    InvalidBinning(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
