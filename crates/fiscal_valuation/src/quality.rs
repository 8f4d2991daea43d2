//! Threshold-driven quality flags.
//!
//! Stateless rule evaluation: each rule reads the valuation result and
//! cash-flow series, compares one metric to its configured threshold, and
//! emits zero or one flag. Rules are independent and order-irrelevant; the
//! table is plain data so callers can load their own standards.

use serde::{Deserialize, Serialize};

use fiscal_engine::cashflow::CashFlowPeriod;
use fiscal_models::production::ProductionProfile;

use crate::valuation::ValuationResult;

/// How seriously a breach should be taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth a look
    Warning,
    /// Deal-breaking unless explained
    Critical,
}

/// One threshold breach.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityFlag {
    /// Metric that breached, e.g. `"irr"`
    pub metric: String,
    /// Breach severity
    pub severity: Severity,
    /// Human-readable description of the breach
    pub message: String,
    /// Observed value
    pub value: f64,
    /// Configured threshold
    pub threshold: f64,
}

/// The configurable threshold table.
///
/// Defaults carry the standard screening rules; deserialise a caller's
/// table to override them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    /// IRR below this is critical (fraction)
    pub min_irr: f64,
    /// Payback beyond this is critical (years)
    pub max_payback_years: f64,
    /// Netback below this is critical ($/boe)
    pub min_netback_per_boe: f64,
    /// Lease operating expense above this is critical ($/boe)
    pub max_loe_per_boe: f64,
    /// Government take above this is a warning (fraction)
    pub max_government_take: f64,
    /// First-year production decline above this is a warning (fraction)
    pub max_first_year_decline: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            min_irr: 0.10,
            max_payback_years: 8.0,
            min_netback_per_boe: 0.0,
            max_loe_per_boe: 50.0,
            max_government_take: 0.80,
            max_first_year_decline: 0.25,
        }
    }
}

/// Evaluates every rule against one completed evaluation.
pub fn evaluate_flags(
    table: &ThresholdTable,
    valuation: &ValuationResult,
    periods: &[CashFlowPeriod],
    profile: &ProductionProfile,
) -> Vec<QualityFlag> {
    let total_boe = profile.total_boe();
    [
        irr_rule(table, valuation),
        payback_rule(table, valuation, periods, profile),
        netback_rule(table, periods, total_boe),
        loe_rule(table, periods, total_boe),
        government_take_rule(table, valuation),
        decline_rule(table, profile),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn irr_rule(table: &ThresholdTable, valuation: &ValuationResult) -> Option<QualityFlag> {
    let rate = valuation.irr.rate()?;
    (rate < table.min_irr).then(|| QualityFlag {
        metric: "irr".to_string(),
        severity: Severity::Critical,
        message: format!(
            "IRR {:.1}% below minimum {:.1}%",
            rate * 100.0,
            table.min_irr * 100.0
        ),
        value: rate,
        threshold: table.min_irr,
    })
}

fn payback_rule(
    table: &ThresholdTable,
    valuation: &ValuationResult,
    periods: &[CashFlowPeriod],
    profile: &ProductionProfile,
) -> Option<QualityFlag> {
    match &valuation.payback_years {
        Some(audited) if audited.value > table.max_payback_years => Some(QualityFlag {
            metric: "payback".to_string(),
            severity: Severity::Critical,
            message: format!(
                "Payback {:.1}y beyond maximum {:.1}y",
                audited.value, table.max_payback_years
            ),
            value: audited.value,
            threshold: table.max_payback_years,
        }),
        Some(_) => None,
        None => {
            // Never recovered within the horizon
            let horizon_years = periods.len() as f64 / profile.basis.periods_per_year();
            Some(QualityFlag {
                metric: "payback".to_string(),
                severity: Severity::Critical,
                message: format!("Capital never recovered within {horizon_years:.1}y horizon"),
                value: horizon_years,
                threshold: table.max_payback_years,
            })
        }
    }
}

fn netback_rule(
    table: &ThresholdTable,
    periods: &[CashFlowPeriod],
    total_boe: f64,
) -> Option<QualityFlag> {
    if total_boe <= 0.0 {
        return None;
    }
    let margin_mm: f64 = periods
        .iter()
        .map(|p| p.gross_revenue.value - p.royalty.value - p.opex.value)
        .sum();
    let netback = margin_mm * 1e6 / total_boe;
    (netback < table.min_netback_per_boe).then(|| QualityFlag {
        metric: "netback".to_string(),
        severity: Severity::Critical,
        message: format!("Netback ${netback:.2}/boe is negative"),
        value: netback,
        threshold: table.min_netback_per_boe,
    })
}

fn loe_rule(
    table: &ThresholdTable,
    periods: &[CashFlowPeriod],
    total_boe: f64,
) -> Option<QualityFlag> {
    if total_boe <= 0.0 {
        return None;
    }
    let opex_mm: f64 = periods.iter().map(|p| p.opex.value).sum();
    let loe = opex_mm * 1e6 / total_boe;
    (loe > table.max_loe_per_boe).then(|| QualityFlag {
        metric: "loe_per_boe".to_string(),
        severity: Severity::Critical,
        message: format!(
            "Operating cost ${loe:.2}/boe above ${:.0}/boe screen",
            table.max_loe_per_boe
        ),
        value: loe,
        threshold: table.max_loe_per_boe,
    })
}

fn government_take_rule(
    table: &ThresholdTable,
    valuation: &ValuationResult,
) -> Option<QualityFlag> {
    let take = valuation.government_take_fraction?;
    (take > table.max_government_take).then(|| QualityFlag {
        metric: "government_take".to_string(),
        severity: Severity::Warning,
        message: format!(
            "Government take {:.1}% above {:.0}%",
            take * 100.0,
            table.max_government_take * 100.0
        ),
        value: take,
        threshold: table.max_government_take,
    })
}

fn decline_rule(table: &ThresholdTable, profile: &ProductionProfile) -> Option<QualityFlag> {
    // Annualised first-year decline: volume one year in over the first
    // period's volume
    let ppy = profile.basis.periods_per_year() as usize;
    let first = profile.periods.first()?.volumes.total_boe();
    let year_on = profile.periods.get(ppy)?.volumes.total_boe();
    if first <= 0.0 {
        return None;
    }
    let decline = 1.0 - year_on / first;
    (decline > table.max_first_year_decline).then(|| QualityFlag {
        metric: "first_year_decline".to_string(),
        severity: Severity::Warning,
        message: format!(
            "First-year decline {:.1}% above {:.0}%",
            decline * 100.0,
            table.max_first_year_decline * 100.0
        ),
        value: decline,
        threshold: table.max_first_year_decline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_round_trips_through_serde() {
        let table = ThresholdTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let back: ThresholdTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);

        // Partial override keeps the remaining defaults
        let partial: ThresholdTable = serde_json::from_str(r#"{"min_irr": 0.15}"#).unwrap();
        assert_eq!(partial.min_irr, 0.15);
        assert_eq!(partial.max_payback_years, 8.0);
    }
}
