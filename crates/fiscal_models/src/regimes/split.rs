//! Profit-split mechanisms and threshold tables.

use serde::{Deserialize, Serialize};

use fiscal_core::math::interpolate::LinearInterpolator;
use fiscal_core::types::RegimeError;

/// A selected contractor share and the table bracket that produced it.
///
/// The bracket index is part of the result because PSC audit records must
/// cite which band was used: stair-step vs interpolation and which bracket
/// was selected must be reproducible from the trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitShare {
    /// Contractor share as a fraction in [0, 1]
    pub contractor_pct: f64,
    /// Index of the table row / segment that produced the share
    pub bracket: usize,
}

/// Stair-step lookup into an ordered `(threshold, value)` table.
///
/// Row `i` applies for `x >= threshold[i]` until the next threshold; below
/// the first threshold, the first row applies. Returns the value and the
/// selected row index.
pub fn stairstep_lookup(table: &[(f64, f64)], x: f64) -> (f64, usize) {
    let mut selected = 0;
    for (i, (threshold, _)) in table.iter().enumerate() {
        if x >= *threshold {
            selected = i;
        } else {
            break;
        }
    }
    (table[selected].1, selected)
}

/// Validates an ordered `(threshold, value)` table: non-empty, strictly
/// increasing thresholds, values in [0, 1].
pub(crate) fn validate_table(
    table: &[(f64, f64)],
    name: &'static str,
) -> Result<(), RegimeError> {
    if table.is_empty() {
        return Err(RegimeError::EmptyTable { table: name });
    }
    for (i, window) in table.windows(2).enumerate() {
        if window[1].0 <= window[0].0 {
            return Err(RegimeError::NonMonotonicThresholds {
                table: name,
                index: i + 1,
                prev: window[0].0,
                next: window[1].0,
            });
        }
    }
    for (_, value) in table {
        if !(0.0..=1.0).contains(value) {
            return Err(RegimeError::RateOutOfRange {
                name,
                value: *value,
            });
        }
    }
    Ok(())
}

/// An ordered `(threshold, contractor_pct)` table with its lookup mode.
///
/// The stair-step vs interpolation choice is part of the mechanism's own
/// data, not a flag threaded through the stepping logic: the two variants
/// carry the same table shape and differ only in how a query between
/// thresholds resolves.
///
/// # Example
///
/// ```
/// use fiscal_models::regimes::SplitTable;
///
/// let table = vec![(0.0, 0.60), (1.0, 0.50), (1.5, 0.40)];
///
/// let stair = SplitTable::Stairstep(table.clone());
/// stair.validate().unwrap();
/// // Holds 60% until R reaches 1.0 exactly
/// assert_eq!(stair.contractor_share(0.999_999).contractor_pct, 0.60);
/// assert_eq!(stair.contractor_share(1.0).contractor_pct, 0.50);
///
/// let interp = SplitTable::Interpolated(table);
/// // Halfway between the R=1.0 and R=1.5 rows
/// assert!((interp.contractor_share(1.25).contractor_pct - 0.45).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "table", rename_all = "snake_case")]
pub enum SplitTable {
    /// Share jumps at each threshold crossing; constant between rows.
    Stairstep(Vec<(f64, f64)>),
    /// Share interpolates linearly between bracketing rows, clamped to the
    /// table's min/max share outside the threshold range.
    Interpolated(Vec<(f64, f64)>),
}

impl SplitTable {
    /// Validates thresholds (strictly increasing) and shares (in [0, 1]).
    pub fn validate(&self) -> Result<(), RegimeError> {
        match self {
            SplitTable::Stairstep(t) => validate_table(t, "stairstep split"),
            SplitTable::Interpolated(t) => validate_table(t, "interpolated split"),
        }
    }

    /// Resolves the contractor share for factor value `x` (e.g. R-Factor).
    ///
    /// # Panics
    ///
    /// Panics on an empty table; [`Self::validate`] is required at regime
    /// construction, so an empty table cannot reach a run.
    pub fn contractor_share(&self, x: f64) -> SplitShare {
        match self {
            SplitTable::Stairstep(table) => {
                let (contractor_pct, bracket) = stairstep_lookup(table, x);
                SplitShare {
                    contractor_pct,
                    bracket,
                }
            }
            SplitTable::Interpolated(table) => {
                let xs: Vec<f64> = table.iter().map(|(t, _)| *t).collect();
                let ys: Vec<f64> = table.iter().map(|(_, v)| *v).collect();
                // Table validated at construction; lengths match and xs are
                // strictly increasing.
                let interp = LinearInterpolator::new(&xs, &ys)
                    .expect("validated split table must interpolate");
                SplitShare {
                    contractor_pct: interp.eval(x),
                    bracket: interp.bracket_index(x),
                }
            }
        }
    }

    /// Human-readable label of a bracket, for audit formulas.
    pub fn bracket_label(&self, bracket: usize) -> String {
        let (mode, table) = match self {
            SplitTable::Stairstep(t) => ("stairstep", t),
            SplitTable::Interpolated(t) => ("interpolated", t),
        };
        let lo = table[bracket].0;
        match table.get(bracket + 1) {
            Some((hi, _)) => format!("{mode} bracket {bracket} [{lo}, {hi})"),
            None => format!("{mode} bracket {bracket} [{lo}, inf)"),
        }
    }
}

/// How profit oil is split between contractor and government.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mechanism", rename_all = "snake_case")]
pub enum ProfitSplitMechanism {
    /// Constant contractor percentage.
    Fixed {
        /// Contractor share of profit oil, fraction in [0, 1]
        contractor_pct: f64,
    },
    /// Share depends on current-period gross volume banded into tiers
    /// (stair-step on boe volume).
    ProductionTranche {
        /// Ordered `(volume_threshold_boe, contractor_pct)` tiers
        tiers: Vec<(f64, f64)>,
    },
    /// Share driven by cumulative receipts over cumulative expenditures.
    RFactor {
        /// The threshold table and its lookup mode
        table: SplitTable,
    },
    /// Share steps down as the contractor's achieved return crosses IRR
    /// thresholds; tiers never step backward once crossed.
    RateOfReturn {
        /// Ordered `(irr_threshold, contractor_pct)` tiers; the first tier's
        /// threshold is the pre-return band (conventionally a large negative
        /// sentinel is not needed; tier 0 applies until its successor's
        /// threshold is crossed)
        tiers: Vec<(f64, f64)>,
        /// Annual uplift applied to the negative cumulative balance
        uplift_pct: f64,
    },
}

impl ProfitSplitMechanism {
    /// Validates tables, tiers, and shares.
    pub fn validate(&self) -> Result<(), RegimeError> {
        match self {
            ProfitSplitMechanism::Fixed { contractor_pct } => {
                if !(0.0..=1.0).contains(contractor_pct) {
                    return Err(RegimeError::RateOutOfRange {
                        name: "contractor_pct",
                        value: *contractor_pct,
                    });
                }
                Ok(())
            }
            ProfitSplitMechanism::ProductionTranche { tiers } => {
                validate_table(tiers, "production tranche")
            }
            ProfitSplitMechanism::RFactor { table } => table.validate(),
            ProfitSplitMechanism::RateOfReturn { tiers, uplift_pct } => {
                // IRR thresholds may be negative, so only ordering is
                // checked on the x side; shares still live in [0, 1].
                if tiers.is_empty() {
                    return Err(RegimeError::EmptyTable {
                        table: "rate_of_return tiers",
                    });
                }
                for (i, window) in tiers.windows(2).enumerate() {
                    if window[1].0 <= window[0].0 {
                        return Err(RegimeError::NonMonotonicThresholds {
                            table: "rate_of_return tiers",
                            index: i + 1,
                            prev: window[0].0,
                            next: window[1].0,
                        });
                    }
                }
                for (_, pct) in tiers {
                    if !(0.0..=1.0).contains(pct) {
                        return Err(RegimeError::RateOutOfRange {
                            name: "rate_of_return contractor_pct",
                            value: *pct,
                        });
                    }
                }
                if *uplift_pct < 0.0 {
                    return Err(RegimeError::RateOutOfRange {
                        name: "rate_of_return uplift_pct",
                        value: *uplift_pct,
                    });
                }
                Ok(())
            }
        }
    }
}
