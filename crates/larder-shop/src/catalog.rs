//! The product catalog: names to price histories.
//!
//! Wire encoding, one store entry per product: the key is the product name
//! and the value is the comma-joined price history (`"10,12,11"`), oldest
//! first. A product listed without price information stores the literal
//! `NI` marker instead. The catalog treats the store as opaque string
//! storage; nothing here depends on the file format.

use std::sync::Arc;

use larder_store::Store;
use tracing::debug;

use crate::error::Result;
use crate::product::Product;

/// Stored value marking a product with no recorded price.
const NO_PRICE: &str = "NI";

/// Catalog of products over one shared store.
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<Store>,
}

impl ProductCatalog {
    /// Build a catalog over an already-registered, open store.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Add (or overwrite) a product. `None` lists it without a price.
    pub fn add(&self, name: &str, price: Option<u32>) -> Result<()> {
        let value = match price {
            Some(price) => price.to_string(),
            None => NO_PRICE.to_string(),
        };
        self.store.set(name, &value)?;
        Ok(())
    }

    /// Remove a product. Returns whether it was listed.
    pub fn remove(&self, name: &str) -> Result<bool> {
        Ok(self.store.remove(name)?)
    }

    /// Append a price to the product's history, creating the product when
    /// it is not listed yet. A `NI` marker is replaced by the first price.
    pub fn record_price(&self, name: &str, price: u32) -> Result<()> {
        let history = self
            .store
            .get(name)?
            .filter(|value| value != NO_PRICE && !value.is_empty());
        let value = match history {
            Some(history) => format!("{history},{price}"),
            None => price.to_string(),
        };
        self.store.set(name, value.trim_matches(','))?;
        Ok(())
    }

    /// Drop all history except the most recent price. A product without a
    /// usable history is reset to the `NI` marker.
    pub fn clear_history(&self, name: &str) -> Result<()> {
        let value = match self.get(name)?.and_then(|p| p.last_price()) {
            Some(last) => last.to_string(),
            None => NO_PRICE.to_string(),
        };
        self.store.set(name, &value)?;
        Ok(())
    }

    /// Look up a priced product.
    ///
    /// Returns `None` when the product is absent, listed without a price,
    /// or when its stored history contains no parseable price at all.
    /// Unparseable tokens within a history are dropped, not errors.
    pub fn get(&self, name: &str) -> Result<Option<Product>> {
        let Some(raw) = self.store.get(name)? else {
            return Ok(None);
        };
        if raw == NO_PRICE {
            return Ok(None);
        }
        let prices: Vec<u32> = raw
            .split(',')
            .filter_map(|token| token.trim().parse().ok())
            .collect();
        if prices.is_empty() {
            debug!(name, "price history holds no parseable price");
            return Ok(None);
        }
        let name = self
            .store
            .canonical_key(name)?
            .unwrap_or_else(|| name.to_string());
        Ok(Some(Product { name, prices }))
    }

    /// All listed products in catalog order, capped at `limit` when given.
    ///
    /// Products listed without a price appear with an empty history, so a
    /// catalog listing never hides an unpriced product.
    pub fn products(&self, limit: Option<usize>) -> Result<Vec<Product>> {
        let mut products = Vec::new();
        for key in self.store.keys()? {
            if limit.is_some_and(|limit| products.len() >= limit) {
                break;
            }
            let product = self.get(&key)?.unwrap_or_else(|| Product::unpriced(&key));
            products.push(product);
        }
        Ok(products)
    }

    /// Case-insensitive product search.
    ///
    /// Names starting with the query rank before names merely containing
    /// it; within each group, catalog order is kept and every product is
    /// reported once.
    pub fn search(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.to_lowercase();
        let mut starts = Vec::new();
        let mut contains = Vec::new();
        for key in self.store.keys()? {
            let folded = key.to_lowercase();
            if folded.starts_with(&needle) {
                starts.push(key);
            } else if folded.contains(&needle) {
                contains.push(key);
            }
        }

        starts
            .into_iter()
            .chain(contains)
            .map(|key| {
                Ok(self
                    .get(&key)?
                    .unwrap_or_else(|| Product::unpriced(&key)))
            })
            .collect()
    }
}
