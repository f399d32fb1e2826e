//! Domain layers of the shopping application, built on larder stores.
//!
//! Two thin layers over the key-value core, each owning the encoding of its
//! own values and treating the store as opaque string storage:
//!
//! - [`ProductCatalog`] -- product names to comma-joined price histories
//!   (`"10,12,11"`, or the `NI` marker for an unpriced product)
//! - [`ShoppingList`] -- product names to `quantity|purchasedFlag` lines,
//!   joined against the catalog on read
//!
//! Neither layer creates stores: the composition root registers the
//! backing stores by name in a `larder_registry::Registry` and hands the
//! `Arc<Store>` handles in.

pub mod catalog;
pub mod error;
pub mod list;
pub mod product;

pub use catalog::ProductCatalog;
pub use error::{Result, ShopError};
pub use list::{ShoppingItem, ShoppingList};
pub use product::Product;
