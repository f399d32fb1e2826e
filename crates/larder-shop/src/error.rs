//! Error types for the domain layers.

use thiserror::Error;

/// Errors that can occur in the catalog and shopping-list layers.
///
/// Malformed stored encodings are not errors: they degrade to absent items
/// or to the documented field defaults, matching the store's own coercion
/// contract.
#[derive(Debug, Error)]
pub enum ShopError {
    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] larder_store::StoreError),
}

/// Convenience alias for domain results.
pub type Result<T> = std::result::Result<T, ShopError>;
