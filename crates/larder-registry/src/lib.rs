//! Named-store directory for larder.
//!
//! Applications usually run more than one store -- a product catalog here, a
//! settings file there. The [`Registry`] maps logical names to
//! [`Store`](larder_store::Store) instances so the composition root
//! registers each store once and every other layer addresses it by name. A
//! single implicit default store, addressed by a reassignable path, covers
//! the "just give me the app config" case.
//!
//! The registry is an explicit value, not a process global: construct one,
//! share it (`Arc<Registry>`), and tests can build as many isolated
//! registries as they need.

pub mod error;
pub mod registry;

pub use error::{RegistryError, Result};
pub use registry::Registry;
