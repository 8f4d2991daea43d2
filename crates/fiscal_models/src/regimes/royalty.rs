//! Royalty schedules.

use serde::{Deserialize, Serialize};

use fiscal_core::types::RegimeError;

use super::split::{stairstep_lookup, validate_table};

/// A royalty rate schedule: flat, or a sliding scale keyed off realised
/// price or gross volume.
///
/// The fold evaluates the schedule every period with that period's price and
/// volume; it never assumes the rate is flat.
///
/// # Example
///
/// ```
/// use fiscal_models::regimes::RoyaltySchedule;
///
/// let sched = RoyaltySchedule::SlidingScaleByPrice {
///     table: vec![(0.0, 0.10), (60.0, 0.125), (90.0, 0.15)],
/// };
/// sched.validate().unwrap();
/// assert_eq!(sched.rate_for(55.0, 1_000.0).0, 0.10);
/// assert_eq!(sched.rate_for(70.0, 1_000.0).0, 0.125);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schedule", rename_all = "snake_case")]
pub enum RoyaltySchedule {
    /// A single rate for every period.
    Flat {
        /// Royalty rate, fraction in [0, 1]
        rate: f64,
    },
    /// Stair-step scale on the period's volume-weighted realised price.
    SlidingScaleByPrice {
        /// Ordered `(price_threshold, rate)` rows
        table: Vec<(f64, f64)>,
    },
    /// Stair-step scale on the period's gross boe volume.
    SlidingScaleByVolume {
        /// Ordered `(volume_threshold_boe, rate)` rows
        table: Vec<(f64, f64)>,
    },
}

impl RoyaltySchedule {
    /// Validates rates and threshold ordering.
    pub fn validate(&self) -> Result<(), RegimeError> {
        match self {
            RoyaltySchedule::Flat { rate } => {
                if !(0.0..=1.0).contains(rate) {
                    return Err(RegimeError::RateOutOfRange {
                        name: "royalty rate",
                        value: *rate,
                    });
                }
                Ok(())
            }
            RoyaltySchedule::SlidingScaleByPrice { table } => {
                validate_table(table, "royalty by price")
            }
            RoyaltySchedule::SlidingScaleByVolume { table } => {
                validate_table(table, "royalty by volume")
            }
        }
    }

    /// Evaluates the schedule for one period, returning the rate and a
    /// short description of how it was selected (for the audit record).
    pub fn rate_for(&self, realised_price: f64, volume_boe: f64) -> (f64, String) {
        match self {
            RoyaltySchedule::Flat { rate } => (*rate, "flat".to_string()),
            RoyaltySchedule::SlidingScaleByPrice { table } => {
                let (rate, bracket) = stairstep_lookup(table, realised_price);
                (
                    rate,
                    format!("price sliding scale bracket {bracket} (price {realised_price})"),
                )
            }
            RoyaltySchedule::SlidingScaleByVolume { table } => {
                let (rate, bracket) = stairstep_lookup(table, volume_boe);
                (
                    rate,
                    format!("volume sliding scale bracket {bracket} (volume {volume_boe})"),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_rate() {
        let sched = RoyaltySchedule::Flat { rate: 0.125 };
        sched.validate().unwrap();
        assert_eq!(sched.rate_for(100.0, 1.0).0, 0.125);
    }

    #[test]
    fn test_flat_rate_out_of_range() {
        assert!(RoyaltySchedule::Flat { rate: 1.1 }.validate().is_err());
        assert!(RoyaltySchedule::Flat { rate: -0.1 }.validate().is_err());
    }

    #[test]
    fn test_sliding_by_volume() {
        let sched = RoyaltySchedule::SlidingScaleByVolume {
            table: vec![(0.0, 0.05), (10_000.0, 0.10)],
        };
        sched.validate().unwrap();
        assert_eq!(sched.rate_for(70.0, 9_999.0).0, 0.05);
        assert_eq!(sched.rate_for(70.0, 10_000.0).0, 0.10);
    }

    #[test]
    fn test_selection_described_for_audit() {
        let sched = RoyaltySchedule::SlidingScaleByPrice {
            table: vec![(0.0, 0.10), (60.0, 0.125)],
        };
        let (_, description) = sched.rate_for(70.0, 1.0);
        assert!(description.contains("bracket 1"));
    }

    #[test]
    fn test_non_monotonic_table_rejected() {
        let sched = RoyaltySchedule::SlidingScaleByPrice {
            table: vec![(60.0, 0.10), (60.0, 0.125)],
        };
        assert!(sched.validate().is_err());
    }
}
