//! Per-product volume container.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::units::Product;

/// Conversion factor from mcf of gas to one barrel of oil equivalent.
///
/// 6:1 is the conventional energy-equivalence ratio; callers with a
/// contract-specific factor pass it to [`ProductVolumes::total_boe_with`].
pub const DEFAULT_GAS_BOE_FACTOR: f64 = 6.0;

/// Volumes for one period, keyed by product stream.
///
/// Liquids (oil, NGL) are in barrels; gas is in mcf. A `BTreeMap` keeps
/// iteration order deterministic so audit records and serialised output are
/// reproducible byte-for-byte.
///
/// # Examples
///
/// ```
/// use fiscal_core::types::{Product, ProductVolumes};
///
/// let v = ProductVolumes::new()
///     .with(Product::Oil, 30_000.0)
///     .with(Product::Gas, 60_000.0);
/// assert_eq!(v.get(Product::Oil), 30_000.0);
/// assert_eq!(v.get(Product::Ngl), 0.0);
/// // 30,000 bbl + 60,000 mcf / 6.0 = 40,000 boe
/// assert!((v.total_boe() - 40_000.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductVolumes {
    volumes: BTreeMap<Product, f64>,
}

impl ProductVolumes {
    /// Creates an empty volume set (all products zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, product: Product, volume: f64) -> Self {
        self.volumes.insert(product, volume);
        self
    }

    /// Sets the volume for a product.
    pub fn set(&mut self, product: Product, volume: f64) {
        self.volumes.insert(product, volume);
    }

    /// Returns the volume for a product, zero if absent.
    pub fn get(&self, product: Product) -> f64 {
        self.volumes.get(&product).copied().unwrap_or(0.0)
    }

    /// Iterates over (product, volume) pairs in canonical product order.
    pub fn iter(&self) -> impl Iterator<Item = (Product, f64)> + '_ {
        self.volumes.iter().map(|(p, v)| (*p, *v))
    }

    /// Returns true if every stored volume is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.volumes.values().all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Total barrels of oil equivalent using the default 6:1 gas factor.
    pub fn total_boe(&self) -> f64 {
        self.total_boe_with(DEFAULT_GAS_BOE_FACTOR)
    }

    /// Total barrels of oil equivalent using an explicit gas-to-boe factor.
    pub fn total_boe_with(&self, gas_boe_factor: f64) -> f64 {
        self.volumes
            .iter()
            .map(|(p, v)| if p.is_gas() { v / gas_boe_factor } else { *v })
            .sum()
    }

    /// Returns a copy with every volume scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            volumes: self
                .volumes
                .iter()
                .map(|(p, v)| (*p, v * factor))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_product_is_zero() {
        let v = ProductVolumes::new();
        assert_eq!(v.get(Product::Oil), 0.0);
        assert!(v.is_valid());
    }

    #[test]
    fn test_total_boe_mixed() {
        let v = ProductVolumes::new()
            .with(Product::Oil, 1_000.0)
            .with(Product::Gas, 12_000.0)
            .with(Product::Ngl, 500.0);
        assert_relative_eq!(v.total_boe(), 1_000.0 + 2_000.0 + 500.0);
        assert_relative_eq!(v.total_boe_with(4.0), 1_000.0 + 3_000.0 + 500.0);
    }

    #[test]
    fn test_negative_volume_invalid() {
        let v = ProductVolumes::new().with(Product::Oil, -1.0);
        assert!(!v.is_valid());
    }

    #[test]
    fn test_scaled() {
        let v = ProductVolumes::new().with(Product::Oil, 100.0);
        assert_relative_eq!(v.scaled(1.2).get(Product::Oil), 120.0);
    }
}
