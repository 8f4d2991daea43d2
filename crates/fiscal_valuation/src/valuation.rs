//! Valuation metrics over a post-fiscal cash-flow series.

use serde::{Deserialize, Serialize};

use fiscal_core::audit::{AuditTrail, Audited};
use fiscal_core::math::solvers::SolverConfig;
use fiscal_core::types::{EngineError, PeriodBasis, Unit, ValuationError};
use fiscal_engine::cashflow::{government_take_fraction, indexed_net_series, CashFlowPeriod};
use fiscal_models::production::ProductionProfile;

use crate::irr::{internal_rate_of_return, IrrOutcome};

/// Net present value of an index-stamped flow series at an annual rate.
///
/// Each entry carries the period index the flow lands in, so a series that
/// starts mid-horizon discounts at its true timing rather than its slice
/// position. Flows land at end of period: the flow at index `t` is
/// discounted by `(1 + rate)^years_at(t)`, so a monthly series discounts
/// with monthly granularity while the rate stays annual.
pub fn npv(flows: &[(usize, f64)], rate: f64, basis: PeriodBasis) -> f64 {
    flows
        .iter()
        .map(|&(t, flow)| flow / (1.0 + rate).powf(basis.years_at(t)))
        .sum()
}

/// Payback time in years: the point at which cumulative undiscounted net
/// cash flow first crosses from negative to non-negative, interpolated to
/// fractional-period precision within the crossing period's index. `None`
/// if never recovered in the horizon; `0.0` if the cumulative balance
/// never goes negative.
pub fn payback_years(flows: &[(usize, f64)], basis: PeriodBasis) -> Option<f64> {
    let mut cum = 0.0;
    for &(t, flow) in flows {
        let prev = cum;
        cum += flow;
        if prev < 0.0 && cum >= 0.0 {
            let fraction = if flow > 0.0 { -prev / flow } else { 1.0 };
            return Some((t as f64 + fraction) / basis.periods_per_year());
        }
    }
    if cum >= 0.0 && !flows.is_empty() {
        // Never dipped below zero
        Some(0.0)
    } else {
        None
    }
}

/// The pricing basis a PV-10 figure was computed under.
///
/// PV-10 definitions vary by reporting standard, so the basis is a
/// required parameter the engine records but never chooses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum PriceBasis {
    /// Trailing average of historical benchmark prices.
    TrailingAverage {
        /// Averaging window, in periods
        window: usize,
    },
    /// Forward curve as of the evaluation date.
    ForwardCurve,
}

impl PriceBasis {
    fn describe(&self) -> String {
        match self {
            PriceBasis::TrailingAverage { window } => {
                format!("trailing_average({window})")
            }
            PriceBasis::ForwardCurve => "forward_curve".to_string(),
        }
    }
}

/// Scope and basis of a PV-10 calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pv10Basis {
    /// How the deck feeding the valued cash flows was priced
    pub price_basis: PriceBasis,
    /// Period indices in scope (producing / near-term categories); the
    /// discount exponent keeps each period's own timing
    pub in_scope: Vec<usize>,
}

/// The PV-10 discount rate.
pub const PV10_RATE: f64 = 0.10;

/// What to value and against which denominators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuationRequest {
    /// Annual discount rates for the NPV grid, fractions
    pub discount_rates: Vec<f64>,
    /// PV-10 scope and pricing basis
    pub pv10: Pv10Basis,
    /// Enterprise value for multiples ($mm); multiples are skipped when
    /// absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_value: Option<f64>,
}

/// Enterprise-value multiples.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuationMultiples {
    /// EV / EBITDA (x)
    pub ev_over_ebitda: Audited,
    /// EV / reserves ($/boe)
    pub ev_per_boe: Audited,
    /// EV / initial daily production ($ per flowing boe per day)
    pub ev_per_daily_boe: Audited,
}

/// Headline valuation metrics, each carrying its audit id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// NPV per requested annual rate, in request order ($mm)
    pub npv_by_rate: Vec<(f64, Audited)>,
    /// IRR solve outcome (annual rate)
    pub irr: IrrOutcome,
    /// Audited IRR value, present only when converged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr_audit: Option<Audited>,
    /// PV-10 over the declared scope ($mm)
    pub pv10: Audited,
    /// Payback in years, `None` if never recovered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payback_years: Option<Audited>,
    /// Multiples, when an enterprise value was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiples: Option<ValuationMultiples>,
    /// Government take as a fraction of pre-take value, when defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub government_take_fraction: Option<f64>,
}

impl ValuationResult {
    /// NPV at the first requested rate, the tornado reference metric.
    pub fn reference_npv(&self) -> f64 {
        self.npv_by_rate.first().map_or(0.0, |(_, a)| a.value)
    }
}

/// Values a cash-flow series: NPV grid, IRR, PV-10, payback, multiples.
///
/// IRR non-convergence is not an error here; it lands in the result as an
/// [`IrrOutcome`] condition code. Errors are reserved for degenerate
/// inputs: an empty series, out-of-scope PV-10 periods, or a non-positive
/// multiple denominator.
pub fn value_cash_flows(
    periods: &[CashFlowPeriod],
    profile: &ProductionProfile,
    request: &ValuationRequest,
    trail: &mut AuditTrail,
) -> Result<ValuationResult, EngineError> {
    if periods.is_empty() {
        return Err(ValuationError::EmptyCashFlow.into());
    }
    let basis = profile.basis;
    let flows = indexed_net_series(periods);

    let mut npv_by_rate = Vec::with_capacity(request.discount_rates.len());
    for &rate in &request.discount_rates {
        let value = npv(&flows, rate, basis);
        let audited = trail.derive(
            "npv = sum(net_cash_flow[t] / (1 + rate)^years[t])",
            value,
            Unit::UsdMm,
            &[("rate", rate), ("periods", flows.len() as f64)],
            &periods
                .iter()
                .map(|p| p.net_cash_flow.id)
                .collect::<Vec<_>>(),
        );
        npv_by_rate.push((rate, audited));
    }

    let irr = internal_rate_of_return(&flows, basis, SolverConfig::default());
    let irr_audit = irr.rate().map(|rate| {
        trail.derive(
            "irr: npv(rate) = 0, Brent on bracketed sign change",
            rate,
            Unit::Fraction,
            &[("rate", rate)],
            &periods
                .iter()
                .map(|p| p.net_cash_flow.id)
                .collect::<Vec<_>>(),
        )
    });

    let pv10 = pv10_in_scope(periods, basis, &request.pv10, trail)?;

    let payback = payback_years(&flows, basis).map(|years| {
        trail.derive(
            "payback: cumulative net cash flow crosses zero, interpolated",
            years,
            Unit::Years,
            &[("years", years)],
            &periods
                .iter()
                .map(|p| p.net_cash_flow.id)
                .collect::<Vec<_>>(),
        )
    });

    let multiples = match request.enterprise_value {
        Some(ev) => Some(compute_multiples(ev, periods, profile, trail)?),
        None => None,
    };

    Ok(ValuationResult {
        npv_by_rate,
        irr,
        irr_audit,
        pv10,
        payback_years: payback,
        multiples,
        government_take_fraction: government_take_fraction(periods),
    })
}

/// NPV at 10% over the in-scope periods only, each keeping its own
/// discount exponent. The pricing basis is recorded in the audit formula
/// so the figure is reproducible under the standard it was computed for.
fn pv10_in_scope(
    periods: &[CashFlowPeriod],
    basis: PeriodBasis,
    pv10: &Pv10Basis,
    trail: &mut AuditTrail,
) -> Result<Audited, EngineError> {
    let mut value = 0.0;
    let mut parents = Vec::with_capacity(pv10.in_scope.len());
    for &index in &pv10.in_scope {
        let period = periods
            .iter()
            .find(|p| p.index == index)
            .ok_or(ValuationError::ScopeOutOfRange {
                period: index,
                horizon: periods.len(),
            })?;
        value += period.net_cash_flow.value / (1.0 + PV10_RATE).powf(basis.years_at(index));
        parents.push(period.net_cash_flow.id);
    }
    Ok(trail.derive(
        &format!(
            "pv10 = sum over in-scope periods at 10%, basis {}",
            pv10.price_basis.describe()
        ),
        value,
        Unit::UsdMm,
        &[
            ("rate", PV10_RATE),
            ("in_scope_periods", pv10.in_scope.len() as f64),
        ],
        &parents,
    ))
}

fn compute_multiples(
    enterprise_value: f64,
    periods: &[CashFlowPeriod],
    profile: &ProductionProfile,
    trail: &mut AuditTrail,
) -> Result<ValuationMultiples, EngineError> {
    let ev = trail.input("enterprise_value", enterprise_value, Unit::UsdMm, None);

    // EBITDA: revenue net of royalty and operating cost, before tax and
    // capital items, over the full series ($mm)
    let ebitda: f64 = periods
        .iter()
        .map(|p| p.gross_revenue.value - p.royalty.value - p.opex.value)
        .sum();
    let reserves_boe = profile.total_boe();
    let initial_boepd = profile
        .periods
        .first()
        .map_or(0.0, |p| p.volumes.total_boe() * profile.basis.periods_per_year() / 365.0);

    let ev_over_ebitda = checked_ratio("ev_over_ebitda", ev, ebitda, Unit::Fraction, trail)?;
    // $/boe: EV is $mm, reserves in boe
    let ev_per_boe = checked_ratio_scaled(
        "ev_per_boe",
        ev,
        reserves_boe,
        1e6,
        Unit::UsdPerBoe,
        trail,
    )?;
    // $ per flowing boe/d
    let ev_per_daily_boe = checked_ratio_scaled(
        "ev_per_daily_boe",
        ev,
        initial_boepd,
        1e6,
        Unit::UsdPerBoe,
        trail,
    )?;

    Ok(ValuationMultiples {
        ev_over_ebitda,
        ev_per_boe,
        ev_per_daily_boe,
    })
}

fn checked_ratio(
    metric: &'static str,
    ev: Audited,
    denominator: f64,
    unit: Unit,
    trail: &mut AuditTrail,
) -> Result<Audited, EngineError> {
    checked_ratio_scaled(metric, ev, denominator, 1.0, unit, trail)
}

fn checked_ratio_scaled(
    metric: &'static str,
    ev: Audited,
    denominator: f64,
    numerator_scale: f64,
    unit: Unit,
    trail: &mut AuditTrail,
) -> Result<Audited, EngineError> {
    if denominator <= 0.0 {
        return Err(ValuationError::DivisionByZero {
            metric,
            denominator,
        }
        .into());
    }
    Ok(trail.derive(
        &format!("{metric} = enterprise_value / denominator"),
        ev.value * numerator_scale / denominator,
        unit,
        &[
            ("enterprise_value", ev.value),
            ("denominator", denominator),
        ],
        &[ev.id],
    ))
}
