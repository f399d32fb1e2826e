//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No store is registered under the given name.
    #[error("no store registered under name: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The default store path was reassigned to an empty or blank value.
    #[error("default store path cannot be empty")]
    EmptyPath,

    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] larder_store::StoreError),

    /// I/O error while resolving a path.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for registry results.
pub type Result<T> = std::result::Result<T, RegistryError>;
