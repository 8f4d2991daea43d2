//! Commodity price decks.
//!
//! A deck is an ordered set of `(period, product, price, differential)`
//! entries. Lookup is strict: any (period, product) the production profile
//! needs that the deck does not cover is a [`DeckError::Gap`]; the engine
//! fails fast rather than silently extrapolating the last known price.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fiscal_core::types::{DeckError, PeriodBasis, Product};

use crate::production::ProductionProfile;

/// One deck entry: realised price and quality/transport differential for a
/// (period, product) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckEntry {
    /// Period index this entry covers
    pub period: usize,
    /// Product stream this entry covers
    pub product: Product,
    /// Benchmark price ($/bbl for liquids, $/mcf for gas)
    pub price: f64,
    /// Differential subtracted from the benchmark ($/unit)
    pub differential: f64,
}

impl DeckEntry {
    /// Realised price after differential.
    pub fn net_price(&self) -> f64 {
        self.price - self.differential
    }
}

/// A validated price deck with strict lookup.
///
/// # Example
///
/// ```
/// use fiscal_core::types::{PeriodBasis, Product};
/// use fiscal_models::deck::PriceDeck;
///
/// let deck = PriceDeck::flat(&[(Product::Oil, 70.0, 2.5)], 12).unwrap();
/// assert_eq!(deck.net_price(5, Product::Oil).unwrap(), 67.5);
/// // Uncovered pairs are an error, never an extrapolation
/// assert!(deck.net_price(12, Product::Oil).is_err());
/// assert!(deck.net_price(0, Product::Gas).is_err());
///
/// let esc = PriceDeck::escalating(
///     &[(Product::Oil, 70.0, 0.0)], 0.02, PeriodBasis::Annual, 3,
/// ).unwrap();
/// assert!((esc.net_price(2, Product::Oil).unwrap() - 70.0 * 1.02_f64.powi(2)).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DeckEntry>", into = "Vec<DeckEntry>")]
pub struct PriceDeck {
    entries: BTreeMap<(usize, Product), DeckEntry>,
}

// Serialised as the flat entry list of the input contract; deserialisation
// runs the same validation as `strip`.
impl From<PriceDeck> for Vec<DeckEntry> {
    fn from(deck: PriceDeck) -> Self {
        deck.entries.into_values().collect()
    }
}

impl TryFrom<Vec<DeckEntry>> for PriceDeck {
    type Error = DeckError;

    fn try_from(entries: Vec<DeckEntry>) -> Result<Self, Self::Error> {
        Self::strip(entries)
    }
}

impl PriceDeck {
    /// Builds a deck from explicit entries (a "strip" deck).
    ///
    /// Rejects non-finite or negative prices; later duplicates of a
    /// (period, product) pair overwrite earlier ones.
    pub fn strip(entries: Vec<DeckEntry>) -> Result<Self, DeckError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if !entry.price.is_finite() || entry.price < 0.0 || !entry.differential.is_finite() {
                return Err(DeckError::InvalidPrice {
                    period: entry.period,
                    product: entry.product,
                    price: entry.price,
                });
            }
            map.insert((entry.period, entry.product), entry);
        }
        Ok(Self { entries: map })
    }

    /// Builds a flat deck: the same price and differential for every period
    /// in `[0, horizon)`.
    pub fn flat(prices: &[(Product, f64, f64)], horizon: usize) -> Result<Self, DeckError> {
        let entries = prices
            .iter()
            .flat_map(|&(product, price, differential)| {
                (0..horizon).map(move |period| DeckEntry {
                    period,
                    product,
                    price,
                    differential,
                })
            })
            .collect();
        Self::strip(entries)
    }

    /// Builds an escalating deck: base prices compounded annually.
    ///
    /// The escalation applies per elapsed year, so a monthly deck holds each
    /// year's price for 12 periods.
    pub fn escalating(
        base: &[(Product, f64, f64)],
        escalation_per_year: f64,
        basis: PeriodBasis,
        horizon: usize,
    ) -> Result<Self, DeckError> {
        let ppy = basis.periods_per_year();
        let entries = base
            .iter()
            .flat_map(|&(product, price, differential)| {
                (0..horizon).map(move |period| {
                    let years = (period as f64 / ppy).floor();
                    DeckEntry {
                        period,
                        product,
                        price: price * (1.0 + escalation_per_year).powf(years),
                        differential,
                    }
                })
            })
            .collect();
        Self::strip(entries)
    }

    /// A copy of the deck with one product's benchmark price scaled;
    /// differentials are absolute and stay as-is.
    pub fn scaled(&self, product: Product, factor: f64) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(&key, entry)| {
                let mut entry = *entry;
                if key.1 == product {
                    entry.price *= factor;
                }
                (key, entry)
            })
            .collect();
        Self { entries }
    }

    /// Strict lookup of the entry for a (period, product) pair.
    pub fn entry(&self, period: usize, product: Product) -> Result<&DeckEntry, DeckError> {
        self.entries
            .get(&(period, product))
            .ok_or(DeckError::Gap { period, product })
    }

    /// Realised price after differential for a (period, product) pair.
    pub fn net_price(&self, period: usize, product: Product) -> Result<f64, DeckError> {
        self.entry(period, product).map(DeckEntry::net_price)
    }

    /// Number of entries in the deck.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the deck has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verifies the deck covers every (period, product) pair the profile
    /// produces volume for. Run before the fiscal fold so a gap aborts the
    /// evaluation before period 0 is computed.
    pub fn validate_coverage(&self, profile: &ProductionProfile) -> Result<(), DeckError> {
        for period in &profile.periods {
            for (product, volume) in period.volumes.iter() {
                if volume > 0.0 && !self.entries.contains_key(&(period.index, product)) {
                    return Err(DeckError::Gap {
                        period: period.index,
                        product,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::{PeriodKind, ProductionPeriod, ProductionProfileBuilder};
    use approx::assert_relative_eq;
    use fiscal_core::types::ProductVolumes;

    #[test]
    fn test_flat_deck_lookup() {
        let deck = PriceDeck::flat(&[(Product::Oil, 70.0, 2.5), (Product::Gas, 3.0, 0.1)], 24)
            .unwrap();
        assert_eq!(deck.len(), 48);
        assert_relative_eq!(deck.net_price(23, Product::Gas).unwrap(), 2.9);
    }

    #[test]
    fn test_gap_is_error() {
        let deck = PriceDeck::flat(&[(Product::Oil, 70.0, 0.0)], 12).unwrap();
        let err = deck.net_price(12, Product::Oil).unwrap_err();
        assert_eq!(
            err,
            DeckError::Gap {
                period: 12,
                product: Product::Oil
            }
        );
    }

    #[test]
    fn test_invalid_price_rejected() {
        let result = PriceDeck::strip(vec![DeckEntry {
            period: 0,
            product: Product::Oil,
            price: f64::NAN,
            differential: 0.0,
        }]);
        assert!(matches!(result, Err(DeckError::InvalidPrice { .. })));
    }

    #[test]
    fn test_escalating_monthly_steps_yearly() {
        let deck =
            PriceDeck::escalating(&[(Product::Oil, 60.0, 0.0)], 0.05, PeriodBasis::Monthly, 25)
                .unwrap();
        assert_relative_eq!(deck.net_price(11, Product::Oil).unwrap(), 60.0);
        assert_relative_eq!(deck.net_price(12, Product::Oil).unwrap(), 63.0);
        assert_relative_eq!(deck.net_price(24, Product::Oil).unwrap(), 66.15);
    }

    #[test]
    fn test_coverage_validation() {
        let series = vec![
            ProductionPeriod {
                index: 0,
                volumes: ProductVolumes::new().with(Product::Oil, 100.0),
                kind: PeriodKind::Forecast,
            },
            ProductionPeriod {
                index: 1,
                volumes: ProductVolumes::new()
                    .with(Product::Oil, 90.0)
                    .with(Product::Gas, 50.0),
                kind: PeriodKind::Forecast,
            },
        ];
        let profile = ProductionProfileBuilder::new(PeriodBasis::Monthly)
            .from_series(series)
            .unwrap();

        // Oil-only deck misses the gas volume in period 1
        let deck = PriceDeck::flat(&[(Product::Oil, 70.0, 0.0)], 2).unwrap();
        let err = deck.validate_coverage(&profile).unwrap_err();
        assert_eq!(
            err,
            DeckError::Gap {
                period: 1,
                product: Product::Gas
            }
        );

        let full = PriceDeck::flat(&[(Product::Oil, 70.0, 0.0), (Product::Gas, 3.0, 0.0)], 2)
            .unwrap();
        assert!(full.validate_coverage(&profile).is_ok());
    }
}
