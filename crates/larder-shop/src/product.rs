//! Product data and price statistics.

use serde::{Deserialize, Serialize};

/// A catalog product with its recorded price history.
///
/// The history is ordered oldest to newest. A product listed without any
/// recorded price carries an empty history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product name, in the catalog's stored casing.
    pub name: String,
    /// Recorded prices, oldest first.
    pub prices: Vec<u32>,
}

impl Product {
    /// A product with no recorded prices.
    pub fn unpriced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prices: Vec::new(),
        }
    }

    /// The most recently recorded price, if any.
    pub fn last_price(&self) -> Option<u32> {
        self.prices.last().copied()
    }

    /// Mean of the recorded prices; `0.0` for an empty history.
    pub fn average_price(&self) -> f64 {
        if self.prices.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.prices.iter().map(|&p| f64::from(p)).sum();
        sum / self.prices.len() as f64
    }

    /// Population variance of the recorded prices, truncated to an integer.
    pub fn price_variance(&self) -> u32 {
        if self.prices.is_empty() {
            return 0;
        }
        let avg = self.average_price();
        let variance: f64 = self
            .prices
            .iter()
            .map(|&p| (f64::from(p) - avg).powi(2))
            .sum::<f64>()
            / self.prices.len() as f64;
        variance as u32
    }

    /// Standard deviation derived from the truncated variance, itself
    /// truncated to an integer.
    pub fn price_std_dev(&self) -> u32 {
        f64::from(self.price_variance()).sqrt() as u32
    }
}
