//! The shopping list: products to buy, with quantity and purchase state.
//!
//! Wire encoding, one store entry per listed product: the key is the
//! product name and the value is `quantity|purchasedFlag`, the flag being
//! `1` for purchased and `0` otherwise. A malformed quantity defaults to 1
//! and a malformed flag to unpurchased; a value without exactly one `|`
//! separator makes the whole item unreadable.

use std::sync::Arc;

use larder_store::Store;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductCatalog;
use crate::error::Result;
use crate::product::Product;

/// One line on the shopping list, joined with its catalog product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    /// The catalog product this line refers to.
    pub product: Product,
    /// How many to buy.
    pub quantity: u32,
    /// Whether the line has been checked off.
    pub purchased: bool,
}

impl ShoppingItem {
    /// Projected cost of the line: last recorded price times quantity.
    /// An unpriced product contributes nothing.
    pub fn total_price(&self) -> u32 {
        self.product.last_price().unwrap_or(0) * self.quantity
    }
}

/// The shopping list over one shared store, joined against the catalog.
#[derive(Clone)]
pub struct ShoppingList {
    store: Arc<Store>,
    catalog: ProductCatalog,
}

impl ShoppingList {
    /// Build a shopping list over its own store, joining items against
    /// `catalog` on read.
    pub fn new(store: Arc<Store>, catalog: ProductCatalog) -> Self {
        Self { store, catalog }
    }

    /// Put a product on the list, overwriting any existing line for it.
    pub fn add(&self, product_name: &str, quantity: u32, purchased: bool) -> Result<()> {
        let value = format!("{quantity}|{}", u8::from(purchased));
        self.store.set(product_name, &value)?;
        Ok(())
    }

    /// Take a product off the list. Returns whether it was listed.
    pub fn remove(&self, product_name: &str) -> Result<bool> {
        Ok(self.store.remove(product_name)?)
    }

    /// Look up one list line, joined with its catalog product.
    ///
    /// Returns `None` when the product is not listed, when its stored value
    /// is unreadable, or when the catalog has no priced product under this
    /// name -- a list line without a product behind it is useless to a UI.
    pub fn get(&self, product_name: &str) -> Result<Option<ShoppingItem>> {
        let Some(raw) = self.store.get(product_name)? else {
            return Ok(None);
        };
        let Some((quantity, purchased)) = decode_line(&raw) else {
            return Ok(None);
        };
        let Some(product) = self.catalog.get(product_name)? else {
            return Ok(None);
        };
        Ok(Some(ShoppingItem {
            product,
            quantity,
            purchased,
        }))
    }

    /// Every readable line, unpurchased first, then by product name.
    pub fn items(&self) -> Result<Vec<ShoppingItem>> {
        let mut items = Vec::new();
        for key in self.store.keys()? {
            if let Some(item) = self.get(&key)? {
                items.push(item);
            }
        }
        items.sort_by(|a, b| {
            a.purchased
                .cmp(&b.purchased)
                .then_with(|| a.product.name.cmp(&b.product.name))
        });
        Ok(items)
    }

    /// Rewrite an existing line's quantity and purchase state.
    ///
    /// Only lines that currently resolve to an item (listed and backed by a
    /// catalog product) are updated; returns whether anything was written.
    pub fn update(&self, product_name: &str, quantity: u32, purchased: bool) -> Result<bool> {
        if self.get(product_name)?.is_none() {
            return Ok(false);
        }
        self.add(product_name, quantity, purchased)?;
        Ok(true)
    }
}

/// Decode `quantity|purchasedFlag`. Exactly two `|`-separated fields are
/// required; within them, an unparseable quantity defaults to 1 and an
/// unparseable flag to unpurchased.
fn decode_line(raw: &str) -> Option<(u32, bool)> {
    let mut parts = raw.split('|');
    let (quantity, flag) = match (parts.next(), parts.next(), parts.next()) {
        (Some(quantity), Some(flag), None) => (quantity, flag),
        _ => return None,
    };
    let quantity = quantity.trim().parse().unwrap_or(1);
    let purchased = flag.trim().parse::<u8>().map(|f| f == 1).unwrap_or(false);
    Some((quantity, purchased))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (tempfile::TempDir, ProductCatalog, ShoppingList) {
        let dir = tempfile::tempdir().unwrap();
        let products = Arc::new(Store::new(dir.path().join("products.cfg")));
        products.open().unwrap();
        let shop = Arc::new(Store::new(dir.path().join("shop-items.cfg")));
        shop.open().unwrap();

        let catalog = ProductCatalog::new(products);
        let list = ShoppingList::new(shop, catalog.clone());
        (dir, catalog, list)
    }

    #[test]
    fn add_and_get_round_trip() {
        let (_dir, catalog, list) = fixtures();
        catalog.add("Alma", Some(10)).unwrap();
        list.add("Alma", 3, false).unwrap();

        let item = list.get("Alma").unwrap().unwrap();
        assert_eq!(item.quantity, 3);
        assert!(!item.purchased);
        assert_eq!(item.product.name, "Alma");
        assert_eq!(item.total_price(), 30);
    }

    #[test]
    fn wire_encoding_is_quantity_pipe_flag() {
        let (_dir, catalog, list) = fixtures();
        catalog.add("Alma", Some(10)).unwrap();
        list.add("Alma", 2, true).unwrap();

        let raw = std::fs::read_to_string(
            list.store.path(),
        )
        .unwrap();
        assert_eq!(raw, "Alma=\"2|1\"\n");
    }

    #[test]
    fn line_without_catalog_product_is_skipped() {
        let (_dir, _catalog, list) = fixtures();
        list.add("Phantom", 1, false).unwrap();

        assert_eq!(list.get("Phantom").unwrap(), None);
        assert!(list.items().unwrap().is_empty());
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let (_dir, catalog, list) = fixtures();
        catalog.add("Alma", Some(10)).unwrap();

        list.store.set("Alma", "many|yes").unwrap();
        let item = list.get("Alma").unwrap().unwrap();
        assert_eq!(item.quantity, 1);
        assert!(!item.purchased);
    }

    #[test]
    fn wrong_field_count_is_unreadable() {
        let (_dir, catalog, list) = fixtures();
        catalog.add("Alma", Some(10)).unwrap();

        list.store.set("Alma", "2").unwrap();
        assert_eq!(list.get("Alma").unwrap(), None);
        list.store.set("Alma", "2|1|0").unwrap();
        assert_eq!(list.get("Alma").unwrap(), None);
    }

    #[test]
    fn items_sort_unpurchased_first_then_by_name() {
        let (_dir, catalog, list) = fixtures();
        for name in ["Alma", "Banán", "Dinnye", "Körte"] {
            catalog.add(name, Some(10)).unwrap();
        }
        list.add("Körte", 1, false).unwrap();
        list.add("Alma", 1, true).unwrap();
        list.add("Dinnye", 2, false).unwrap();
        list.add("Banán", 1, true).unwrap();

        let names: Vec<(String, bool)> = list
            .items()
            .unwrap()
            .into_iter()
            .map(|i| (i.product.name.clone(), i.purchased))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Dinnye".to_string(), false),
                ("Körte".to_string(), false),
                ("Alma".to_string(), true),
                ("Banán".to_string(), true),
            ]
        );
    }

    #[test]
    fn update_rewrites_existing_lines_only() {
        let (_dir, catalog, list) = fixtures();
        catalog.add("Alma", Some(10)).unwrap();
        list.add("Alma", 1, false).unwrap();

        assert!(list.update("Alma", 5, true).unwrap());
        let item = list.get("Alma").unwrap().unwrap();
        assert_eq!(item.quantity, 5);
        assert!(item.purchased);

        assert!(!list.update("Dinnye", 1, false).unwrap());
        assert_eq!(list.get("Dinnye").unwrap(), None);
    }

    #[test]
    fn unpriced_product_contributes_no_cost() {
        let (_dir, catalog, list) = fixtures();
        catalog.add("Dinnye", None).unwrap();
        list.add("Dinnye", 4, false).unwrap();

        // An unpriced product does not resolve through the catalog join.
        assert_eq!(list.get("Dinnye").unwrap(), None);

        let item = ShoppingItem {
            product: Product::unpriced("Dinnye"),
            quantity: 4,
            purchased: false,
        };
        assert_eq!(item.total_price(), 0);
    }
}
