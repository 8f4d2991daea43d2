//! Production profiles and the profile builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fiscal_core::types::volumes::DEFAULT_GAS_BOE_FACTOR;
use fiscal_core::types::{CurveError, PeriodBasis, Product, ProductVolumes};

use super::decline::DeclineCurve;

/// Whether a period's volumes are observed history or model forecast.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// Observed (historical) volumes
    Actual,
    /// Forecast volumes
    Forecast,
}

/// One period of the production profile. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionPeriod {
    /// Period index, strictly increasing across the profile
    pub index: usize,
    /// Volumes by product stream for this period
    pub volumes: ProductVolumes,
    /// Actual vs forecast marker
    pub kind: PeriodKind,
}

/// Explicit record of where and why the profile was truncated.
///
/// The builder never silently drops trailing periods: if the economic limit
/// cut the profile, this says at which period and at what rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Truncation {
    /// First sub-economic period index (excluded from the profile)
    pub period: usize,
    /// Total boe rate at that period
    pub rate_boe: f64,
    /// The configured minimum economic rate
    pub economic_limit: f64,
}

/// An ordered per-period production profile, truncated at the economic limit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionProfile {
    /// Time basis of the period sequence
    pub basis: PeriodBasis,
    /// Periods in strictly increasing index order
    pub periods: Vec<ProductionPeriod>,
    /// Where the economic limit cut the profile, if it did
    pub truncation: Option<Truncation>,
}

impl ProductionProfile {
    /// Number of periods in the profile.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns true if the profile has no periods.
    /// Never true for a builder-produced profile.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Highest period index plus one (the modeled horizon).
    pub fn horizon(&self) -> usize {
        self.periods.last().map(|p| p.index + 1).unwrap_or(0)
    }

    /// Total profile volume in boe (discrete sum over periods).
    pub fn total_boe(&self) -> f64 {
        self.periods.iter().map(|p| p.volumes.total_boe()).sum()
    }

    /// Product streams with any nonzero volume, in canonical order.
    pub fn products(&self) -> Vec<Product> {
        Product::ALL
            .into_iter()
            .filter(|p| self.periods.iter().any(|pp| pp.volumes.get(*p) > 0.0))
            .collect()
    }
}

/// Builds [`ProductionProfile`]s from decline curves or explicit series.
///
/// Input is either per-product decline parameters or an explicit
/// historical + forecast series; output is an ordered profile truncated at
/// the first period whose total boe rate falls below the economic limit,
/// with the truncation recorded explicitly.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use fiscal_core::types::{PeriodBasis, Product};
/// use fiscal_models::production::{DeclineCurve, ProductionProfileBuilder};
///
/// let mut curves = BTreeMap::new();
/// curves.insert(Product::Oil, DeclineCurve::exponential(10_000.0, 0.02).unwrap());
///
/// let profile = ProductionProfileBuilder::new(PeriodBasis::Monthly)
///     .with_economic_limit(500.0)
///     .with_max_periods(600)
///     .from_decline_curves(&curves)
///     .unwrap();
///
/// // Truncated where q(t) fell below 500 boe/period, and it says so
/// let trunc = profile.truncation.unwrap();
/// assert!(trunc.rate_boe < 500.0);
/// assert_eq!(profile.len(), trunc.period);
/// ```
#[derive(Clone, Debug)]
pub struct ProductionProfileBuilder {
    basis: PeriodBasis,
    economic_limit: f64,
    max_periods: usize,
    gas_boe_factor: f64,
}

impl ProductionProfileBuilder {
    /// Creates a builder with no economic limit and a 600-period horizon cap.
    pub fn new(basis: PeriodBasis) -> Self {
        Self {
            basis,
            economic_limit: 0.0,
            max_periods: 600,
            gas_boe_factor: DEFAULT_GAS_BOE_FACTOR,
        }
    }

    /// Sets the minimum economic rate (total boe per period).
    pub fn with_economic_limit(mut self, limit: f64) -> Self {
        self.economic_limit = limit;
        self
    }

    /// Caps the forecast horizon (periods).
    pub fn with_max_periods(mut self, max_periods: usize) -> Self {
        self.max_periods = max_periods;
        self
    }

    /// Overrides the gas-to-boe conversion factor.
    pub fn with_gas_boe_factor(mut self, factor: f64) -> Self {
        self.gas_boe_factor = factor;
        self
    }

    /// Builds a forecast profile from per-product decline curves.
    ///
    /// Period `t` takes the curve rate evaluated at `t` as its volume; the
    /// profile stops at the first period whose combined boe rate is below
    /// the economic limit, recording the [`Truncation`].
    pub fn from_decline_curves(
        &self,
        curves: &BTreeMap<Product, DeclineCurve>,
    ) -> Result<ProductionProfile, CurveError> {
        if curves.is_empty() {
            return Err(CurveError::EmptyProfile {
                reason: "no decline curves supplied".to_string(),
            });
        }

        let mut periods = Vec::new();
        let mut truncation = None;

        for t in 0..self.max_periods {
            let mut volumes = ProductVolumes::new();
            for (product, curve) in curves {
                volumes.set(*product, curve.rate(t as f64));
            }
            let rate_boe = volumes.total_boe_with(self.gas_boe_factor);

            if rate_boe < self.economic_limit {
                truncation = Some(Truncation {
                    period: t,
                    rate_boe,
                    economic_limit: self.economic_limit,
                });
                break;
            }

            periods.push(ProductionPeriod {
                index: t,
                volumes,
                kind: PeriodKind::Forecast,
            });
        }

        if periods.is_empty() {
            return Err(CurveError::EmptyProfile {
                reason: format!(
                    "initial rate already below economic limit of {}",
                    self.economic_limit
                ),
            });
        }

        Ok(ProductionProfile {
            basis: self.basis,
            periods,
            truncation,
        })
    }

    /// Builds a profile from an explicit series, validating ordering and
    /// volumes, then applying the economic limit.
    ///
    /// Fails with `InvalidSeries` on non-increasing indices or negative /
    /// non-finite volumes; never reorders or repairs the input.
    pub fn from_series(
        &self,
        series: Vec<ProductionPeriod>,
    ) -> Result<ProductionProfile, CurveError> {
        if series.is_empty() {
            return Err(CurveError::EmptyProfile {
                reason: "empty input series".to_string(),
            });
        }

        for (i, period) in series.iter().enumerate() {
            if i > 0 && period.index <= series[i - 1].index {
                return Err(CurveError::InvalidSeries {
                    period: period.index,
                    reason: format!(
                        "index not strictly increasing (previous: {})",
                        series[i - 1].index
                    ),
                });
            }
            if !period.volumes.is_valid() {
                return Err(CurveError::InvalidSeries {
                    period: period.index,
                    reason: "negative or non-finite volume".to_string(),
                });
            }
        }

        let mut periods = Vec::new();
        let mut truncation = None;
        for period in series {
            let rate_boe = period.volumes.total_boe_with(self.gas_boe_factor);
            if rate_boe < self.economic_limit {
                truncation = Some(Truncation {
                    period: period.index,
                    rate_boe,
                    economic_limit: self.economic_limit,
                });
                break;
            }
            periods.push(period);
        }

        if periods.is_empty() {
            return Err(CurveError::EmptyProfile {
                reason: format!(
                    "first period already below economic limit of {}",
                    self.economic_limit
                ),
            });
        }

        Ok(ProductionProfile {
            basis: self.basis,
            periods,
            truncation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn oil_curves(qi: f64, di: f64) -> BTreeMap<Product, DeclineCurve> {
        let mut curves = BTreeMap::new();
        curves.insert(Product::Oil, DeclineCurve::exponential(qi, di).unwrap());
        curves
    }

    #[test]
    fn test_truncation_recorded_not_silent() {
        let profile = ProductionProfileBuilder::new(PeriodBasis::Monthly)
            .with_economic_limit(100.0)
            .from_decline_curves(&oil_curves(1_000.0, 0.1))
            .unwrap();

        let trunc = profile.truncation.expect("must record the truncation");
        // q(t) = 1000 e^(-0.1 t) < 100 first at t = 24 (ln 10 / 0.1 ≈ 23.03)
        assert_eq!(trunc.period, 24);
        assert!(trunc.rate_boe < 100.0);
        assert_eq!(profile.len(), 24);
        // Every retained period is economic
        assert!(profile
            .periods
            .iter()
            .all(|p| p.volumes.total_boe() >= 100.0));
    }

    #[test]
    fn test_horizon_cap_without_limit() {
        let profile = ProductionProfileBuilder::new(PeriodBasis::Annual)
            .with_max_periods(10)
            .from_decline_curves(&oil_curves(1_000.0, 0.05))
            .unwrap();
        assert_eq!(profile.len(), 10);
        assert!(profile.truncation.is_none());
    }

    #[test]
    fn test_sub_economic_from_start_fails() {
        let result = ProductionProfileBuilder::new(PeriodBasis::Monthly)
            .with_economic_limit(5_000.0)
            .from_decline_curves(&oil_curves(1_000.0, 0.1));
        assert!(matches!(result, Err(CurveError::EmptyProfile { .. })));
    }

    #[test]
    fn test_series_ordering_enforced() {
        let series = vec![
            ProductionPeriod {
                index: 0,
                volumes: ProductVolumes::new().with(Product::Oil, 100.0),
                kind: PeriodKind::Actual,
            },
            ProductionPeriod {
                index: 0,
                volumes: ProductVolumes::new().with(Product::Oil, 90.0),
                kind: PeriodKind::Forecast,
            },
        ];
        let result = ProductionProfileBuilder::new(PeriodBasis::Monthly).from_series(series);
        assert!(matches!(result, Err(CurveError::InvalidSeries { .. })));
    }

    #[test]
    fn test_series_negative_volume_rejected() {
        let series = vec![ProductionPeriod {
            index: 0,
            volumes: ProductVolumes::new().with(Product::Gas, -1.0),
            kind: PeriodKind::Actual,
        }];
        let result = ProductionProfileBuilder::new(PeriodBasis::Monthly).from_series(series);
        assert!(matches!(result, Err(CurveError::InvalidSeries { .. })));
    }

    #[test]
    fn test_series_truncated_at_limit() {
        let series: Vec<ProductionPeriod> = (0..5)
            .map(|i| ProductionPeriod {
                index: i,
                volumes: ProductVolumes::new().with(Product::Oil, 100.0 - 30.0 * i as f64),
                kind: PeriodKind::Forecast,
            })
            .collect();
        let profile = ProductionProfileBuilder::new(PeriodBasis::Annual)
            .with_economic_limit(35.0)
            .from_series(series)
            .unwrap();
        // Volumes: 100, 70, 40, 10 (<35, cut), ...
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.truncation.unwrap().period, 3);
    }

    #[test]
    fn test_gas_factor_in_economic_limit() {
        let mut curves = BTreeMap::new();
        curves.insert(Product::Gas, DeclineCurve::exponential(6_000.0, 0.1).unwrap());
        // 6,000 mcf / 6.0 = 1,000 boe at t=0
        let profile = ProductionProfileBuilder::new(PeriodBasis::Monthly)
            .with_economic_limit(900.0)
            .from_decline_curves(&curves)
            .unwrap();
        assert_relative_eq!(profile.periods[0].volumes.total_boe(), 1_000.0);
        assert!(profile.len() < 5);
    }

    #[test]
    fn test_total_boe_and_products() {
        let profile = ProductionProfileBuilder::new(PeriodBasis::Annual)
            .with_max_periods(3)
            .from_decline_curves(&oil_curves(100.0, 0.5))
            .unwrap();
        assert_eq!(profile.products(), vec![Product::Oil]);
        let expected: f64 = (0..3).map(|t| 100.0 * (-0.5 * t as f64).exp()).sum();
        assert_relative_eq!(profile.total_boe(), expected);
    }
}
