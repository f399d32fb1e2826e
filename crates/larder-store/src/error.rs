//! Error types for store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An accessor was called before the store was opened.
    #[error("store at {path} is not open; call open() first")]
    NotOpen {
        /// Path of the store the caller tried to use.
        path: PathBuf,
    },

    /// I/O failure on the backing file or its directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
