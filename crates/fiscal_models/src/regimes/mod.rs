//! Fiscal regime definitions.
//!
//! A regime is a closed tagged enum: one variant is active per run, and
//! mixing variant fields is unrepresentable. Each variant validates its
//! parameters at construction time so the Layer-3 fold never re-checks
//! mid-run.
//!
//! # Re-exports
//!
//! - [`RoyaltySchedule`] from `royalty`
//! - [`ProfitSplitMechanism`], [`SplitShare`], [`SplitTable`] from `split`

mod royalty;
mod split;

pub use royalty::RoyaltySchedule;
pub use split::{stairstep_lookup, ProfitSplitMechanism, SplitShare, SplitTable};

use serde::{Deserialize, Serialize};

use fiscal_core::types::RegimeError;

/// Resource rent tax parameters (concessionary add-on).
///
/// RRT maintains an augmented-cost ledger: undeducted costs carry forward
/// with `uplift_rate` compounding, and tax applies to receipts in excess of
/// the augmented balance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RrtParams {
    /// RRT rate on the excess, fraction in [0, 1]
    pub rate: f64,
    /// Per-period uplift on the undeducted balance
    pub uplift_rate: f64,
}

/// Concessionary (royalty/tax) regime parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Concessionary {
    /// Royalty schedule, evaluated per period
    pub royalty: RoyaltySchedule,
    /// Corporate income tax rate, fraction in [0, 1]
    pub tax_rate: f64,
    /// Uplift applied to the depreciable capex base
    pub uplift_pct: f64,
    /// Straight-line depreciation life, in periods
    pub depreciation_periods: usize,
    /// Resource rent tax, if the regime carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrt: Option<RrtParams>,
    /// Ring-fenced: losses clamp at zero instead of carrying forward
    pub ring_fenced: bool,
}

/// Production-sharing contract parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionSharing {
    /// Royalty off the top, fraction in [0, 1]
    pub royalty_pct: f64,
    /// First tranche petroleum taken from post-royalty revenue
    pub ftp_pct: f64,
    /// Cost-recovery ceiling as a fraction of available revenue, in (0, 1]
    pub cost_ceiling_pct: f64,
    /// Uplift accruing on the unrecovered cost carry-forward.
    ///
    /// Required, not defaulted: most contracts pay no interest on
    /// unrecovered costs (`0.0`), but contract-specific uplift exists and
    /// the engine refuses to guess.
    pub carry_forward_uplift_pct: f64,
    /// How profit oil splits between contractor and government
    pub split: ProfitSplitMechanism,
    /// Tax rate on contractor taxable income, fraction in [0, 1]
    pub tax_rate: f64,
}

/// Service contract parameters: per-unit fee plus cost recovery, no profit
/// share.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceContract {
    /// Contractor fee per boe produced
    pub fee_per_unit: f64,
    /// Cost-recovery ceiling as a fraction of the period fee, in (0, 1]
    pub cost_recovery_ceiling_pct: f64,
}

/// A fiscal regime definition, exactly one variant per run.
///
/// # Example
///
/// ```
/// use fiscal_models::regimes::{Concessionary, FiscalRegimeDefinition, RoyaltySchedule};
///
/// let regime = FiscalRegimeDefinition::Concessionary(Concessionary {
///     royalty: RoyaltySchedule::Flat { rate: 0.125 },
///     tax_rate: 0.21,
///     uplift_pct: 0.0,
///     depreciation_periods: 5,
///     rrt: None,
///     ring_fenced: true,
/// });
/// regime.validate().unwrap();
/// assert_eq!(regime.family(), "concessionary");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FiscalRegimeDefinition {
    /// Royalty/tax regime
    Concessionary(Concessionary),
    /// Production-sharing contract
    ProductionSharing(ProductionSharing),
    /// Service contract
    ServiceContract(ServiceContract),
}

impl FiscalRegimeDefinition {
    /// Short family name, used in audit formulas and error context.
    pub fn family(&self) -> &'static str {
        match self {
            FiscalRegimeDefinition::Concessionary(_) => "concessionary",
            FiscalRegimeDefinition::ProductionSharing(_) => "production_sharing",
            FiscalRegimeDefinition::ServiceContract(_) => "service_contract",
        }
    }

    /// Validates every rate, ceiling, and threshold table in the variant.
    pub fn validate(&self) -> Result<(), RegimeError> {
        match self {
            FiscalRegimeDefinition::Concessionary(c) => {
                c.royalty.validate()?;
                check_rate("tax_rate", c.tax_rate)?;
                if c.uplift_pct < 0.0 {
                    return Err(RegimeError::RateOutOfRange {
                        name: "uplift_pct",
                        value: c.uplift_pct,
                    });
                }
                if c.depreciation_periods == 0 {
                    return Err(RegimeError::NonPositive {
                        name: "depreciation_periods",
                        value: 0.0,
                    });
                }
                if let Some(rrt) = &c.rrt {
                    check_rate("rrt rate", rrt.rate)?;
                    if rrt.uplift_rate < 0.0 {
                        return Err(RegimeError::RateOutOfRange {
                            name: "rrt uplift_rate",
                            value: rrt.uplift_rate,
                        });
                    }
                }
                Ok(())
            }
            FiscalRegimeDefinition::ProductionSharing(p) => {
                check_rate("royalty_pct", p.royalty_pct)?;
                check_rate("ftp_pct", p.ftp_pct)?;
                check_ceiling("cost_ceiling_pct", p.cost_ceiling_pct)?;
                if p.carry_forward_uplift_pct < 0.0 {
                    return Err(RegimeError::RateOutOfRange {
                        name: "carry_forward_uplift_pct",
                        value: p.carry_forward_uplift_pct,
                    });
                }
                p.split.validate()?;
                check_rate("tax_rate", p.tax_rate)
            }
            FiscalRegimeDefinition::ServiceContract(s) => {
                if s.fee_per_unit <= 0.0 || !s.fee_per_unit.is_finite() {
                    return Err(RegimeError::NonPositive {
                        name: "fee_per_unit",
                        value: s.fee_per_unit,
                    });
                }
                check_ceiling("cost_recovery_ceiling_pct", s.cost_recovery_ceiling_pct)
            }
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), RegimeError> {
    if !(0.0..=1.0).contains(&value) || !value.is_finite() {
        return Err(RegimeError::RateOutOfRange { name, value });
    }
    Ok(())
}

fn check_ceiling(name: &'static str, value: f64) -> Result<(), RegimeError> {
    if !(value > 0.0 && value <= 1.0) || !value.is_finite() {
        return Err(RegimeError::CeilingOutOfRange { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psc(cost_ceiling_pct: f64) -> FiscalRegimeDefinition {
        FiscalRegimeDefinition::ProductionSharing(ProductionSharing {
            royalty_pct: 0.10,
            ftp_pct: 0.0,
            cost_ceiling_pct,
            carry_forward_uplift_pct: 0.0,
            split: ProfitSplitMechanism::Fixed { contractor_pct: 0.40 },
            tax_rate: 0.25,
        })
    }

    #[test]
    fn test_psc_ceiling_bounds() {
        assert!(psc(0.6).validate().is_ok());
        assert!(psc(1.0).validate().is_ok());
        // (0, 1]: zero and above-one are both invalid
        assert!(matches!(
            psc(0.0).validate(),
            Err(RegimeError::CeilingOutOfRange { .. })
        ));
        assert!(matches!(
            psc(1.2).validate(),
            Err(RegimeError::CeilingOutOfRange { .. })
        ));
    }

    #[test]
    fn test_psc_split_table_validated() {
        let regime = FiscalRegimeDefinition::ProductionSharing(ProductionSharing {
            royalty_pct: 0.10,
            ftp_pct: 0.0,
            cost_ceiling_pct: 0.6,
            carry_forward_uplift_pct: 0.0,
            split: ProfitSplitMechanism::RFactor {
                table: SplitTable::Stairstep(vec![(1.0, 0.5), (0.5, 0.6)]),
            },
            tax_rate: 0.25,
        });
        assert!(matches!(
            regime.validate(),
            Err(RegimeError::NonMonotonicThresholds { .. })
        ));
    }

    #[test]
    fn test_concessionary_depreciation_required() {
        let regime = FiscalRegimeDefinition::Concessionary(Concessionary {
            royalty: RoyaltySchedule::Flat { rate: 0.125 },
            tax_rate: 0.21,
            uplift_pct: 0.0,
            depreciation_periods: 0,
            rrt: None,
            ring_fenced: false,
        });
        assert!(matches!(
            regime.validate(),
            Err(RegimeError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_service_contract_fee_positive() {
        let regime = FiscalRegimeDefinition::ServiceContract(ServiceContract {
            fee_per_unit: 0.0,
            cost_recovery_ceiling_pct: 0.8,
        });
        assert!(regime.validate().is_err());
    }

    #[test]
    fn test_family_names() {
        assert_eq!(psc(0.5).family(), "production_sharing");
    }

    #[test]
    fn test_serde_tagged_variant() {
        let json = serde_json::to_string(&psc(0.6)).unwrap();
        assert!(json.contains("\"type\":\"production_sharing\""));
        let back: FiscalRegimeDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, psc(0.6));
    }
}
