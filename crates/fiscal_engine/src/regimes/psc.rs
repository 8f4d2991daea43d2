//! Production-sharing contract fold.

use fiscal_core::audit::AuditTrail;
use fiscal_core::math::solvers::{BrentSolver, SolverConfig};
use fiscal_core::types::Unit;
use fiscal_models::regimes::{
    stairstep_lookup, ProductionSharing, ProfitSplitMechanism, SplitShare,
};

use crate::cashflow::CashFlowPeriod;
use crate::revenue::PeriodRevenue;
use crate::state::FiscalState;

use super::StepCosts;

/// One period of the PSC fold.
///
/// Fixed order of operations: royalty, first tranche petroleum, cost
/// recovery against the ceiling, profit split, contractor tax. Cumulative
/// state used by a split mechanism (R-Factor, achieved return) is the
/// balance *entering* the period, so a crossing changes the split from the
/// following period onward.
pub(super) fn step(
    terms: &ProductionSharing,
    mut state: FiscalState,
    rev: &PeriodRevenue,
    costs: StepCosts,
    trail: &mut AuditTrail,
) -> (FiscalState, CashFlowPeriod) {
    let gross = rev.total;

    let royalty = trail.derive(
        "royalty = gross_revenue * royalty_pct",
        gross.value * terms.royalty_pct,
        Unit::UsdMm,
        &[
            ("gross_revenue", gross.value),
            ("royalty_pct", terms.royalty_pct),
        ],
        &[gross.id],
    );
    let post_royalty = gross.value - royalty.value;

    let ftp = trail.derive(
        "ftp = (gross_revenue - royalty) * ftp_pct",
        post_royalty * terms.ftp_pct,
        Unit::UsdMm,
        &[("post_royalty", post_royalty), ("ftp_pct", terms.ftp_pct)],
        &[gross.id, royalty.id],
    );
    let available = post_royalty - ftp.value;

    // Cost recovery: this period's recoverable spend plus the uplifted
    // carry-forward, capped by the ceiling on available revenue.
    let opex = trail.input("opex", costs.opex, Unit::UsdMm, None);
    let capex = trail.input("capex", costs.capex, Unit::UsdMm, None);
    let carry_prev = state.cost_carry_forward * (1.0 + terms.carry_forward_uplift_pct);
    let pool = costs.recoverable + carry_prev;
    let ceiling = available * terms.cost_ceiling_pct;
    let cost_recovered = trail.derive(
        "cost_oil = min(cost_pool, available_revenue * cost_ceiling_pct)",
        pool.min(ceiling),
        Unit::UsdMm,
        &[
            ("cost_pool", pool),
            ("available_revenue", available),
            ("cost_ceiling_pct", terms.cost_ceiling_pct),
            ("carry_forward_uplifted", carry_prev),
            ("recoverable_costs", costs.recoverable),
        ],
        &[gross.id, royalty.id, ftp.id, opex.id, capex.id],
    );
    state.cost_carry_forward = pool - cost_recovered.value;
    let cost_carry_forward = trail.derive(
        "cost_carry_forward = cost_pool - cost_oil",
        state.cost_carry_forward,
        Unit::UsdMm,
        &[
            ("cost_pool", pool),
            ("cost_oil", cost_recovered.value),
        ],
        &[cost_recovered.id],
    );

    let profit_oil = available - cost_recovered.value;
    let share = resolve_split(terms, &mut state, rev);
    let contractor_profit = trail.derive(
        &share.formula,
        profit_oil * share.contractor_pct,
        Unit::UsdMm,
        &[
            ("profit_oil", profit_oil),
            ("contractor_pct", share.contractor_pct),
            ("factor", share.factor),
        ],
        &[cost_recovered.id],
    );
    let government_profit = trail.derive(
        "government_profit_oil = profit_oil - contractor_profit_oil",
        profit_oil - contractor_profit.value,
        Unit::UsdMm,
        &[
            ("profit_oil", profit_oil),
            ("contractor_profit_oil", contractor_profit.value),
        ],
        &[contractor_profit.id],
    );

    let contractor_taxable = cost_recovered.value + contractor_profit.value;
    let tax = trail.derive(
        "tax = (cost_oil + contractor_profit_oil) * tax_rate",
        contractor_taxable * terms.tax_rate,
        Unit::UsdMm,
        &[
            ("contractor_taxable", contractor_taxable),
            ("tax_rate", terms.tax_rate),
        ],
        &[cost_recovered.id, contractor_profit.id],
    );

    let ncf_value = contractor_taxable - tax.value;
    let net_cash_flow = trail.derive(
        "net_cash_flow = cost_oil + contractor_profit_oil - tax",
        ncf_value,
        Unit::UsdMm,
        &[
            ("cost_oil", cost_recovered.value),
            ("contractor_profit_oil", contractor_profit.value),
            ("tax", tax.value),
        ],
        &[cost_recovered.id, contractor_profit.id, tax.id],
    );

    let government_take = trail.derive(
        "government_take = royalty + ftp + government_profit_oil + tax",
        royalty.value + ftp.value + government_profit.value + tax.value,
        Unit::UsdMm,
        &[
            ("royalty", royalty.value),
            ("ftp", ftp.value),
            ("government_profit_oil", government_profit.value),
            ("tax", tax.value),
        ],
        &[royalty.id, ftp.id, government_profit.id, tax.id],
    );

    state.cum_receipts += contractor_taxable;
    state.cum_expenditures += opex.value + capex.value;
    // Cash position, not taxable income: the rate-of-return check needs the
    // capex actually spent, which cost oil only reimburses over time.
    state
        .contractor_cash_flows
        .push(ncf_value - opex.value - capex.value);

    let out = CashFlowPeriod {
        index: rev.index,
        gross_revenue: gross,
        royalty,
        ftp: Some(ftp),
        cost_recovered: Some(cost_recovered),
        cost_carry_forward: Some(cost_carry_forward),
        contractor_profit_oil: Some(contractor_profit),
        government_profit_oil: Some(government_profit),
        opex,
        capex,
        depreciation: None,
        tax,
        rrt: None,
        government_take,
        net_cash_flow,
    };
    (state, out)
}

struct ResolvedSplit {
    contractor_pct: f64,
    /// Value of the driving factor (R, volume, achieved IRR), for the
    /// audit record's inputs
    factor: f64,
    formula: String,
}

/// Selects the contractor share for this period, advancing monotone tier
/// state where the mechanism requires it.
fn resolve_split(
    terms: &ProductionSharing,
    state: &mut FiscalState,
    rev: &PeriodRevenue,
) -> ResolvedSplit {
    match &terms.split {
        ProfitSplitMechanism::Fixed { contractor_pct } => ResolvedSplit {
            contractor_pct: *contractor_pct,
            factor: 0.0,
            formula: "contractor_profit_oil = profit_oil * contractor_pct [fixed]".to_string(),
        },
        ProfitSplitMechanism::ProductionTranche { tiers } => {
            let volume = rev.volume_boe;
            let (contractor_pct, bracket) = stairstep_lookup(tiers, volume);
            ResolvedSplit {
                contractor_pct,
                factor: volume,
                formula: format!(
                    "contractor_profit_oil = profit_oil * contractor_pct \
                     [production tranche {bracket}, volume {volume:.1} boe]"
                ),
            }
        }
        ProfitSplitMechanism::RFactor { table } => {
            // Balances entering the period: the step updates cum_receipts /
            // cum_expenditures only after the split is resolved.
            let r = state.r_factor();
            let SplitShare {
                contractor_pct,
                bracket,
            } = table.contractor_share(r);
            ResolvedSplit {
                contractor_pct,
                factor: r,
                formula: format!(
                    "contractor_profit_oil = profit_oil * contractor_pct \
                     [r_factor {r:.4}, {}]",
                    table.bracket_label(bracket)
                ),
            }
        }
        ProfitSplitMechanism::RateOfReturn { tiers, uplift_pct } => {
            let irr = advance_ror_tier(state, tiers, *uplift_pct);
            let (_, contractor_pct) = tiers[state.ror_tier];
            ResolvedSplit {
                contractor_pct,
                factor: irr,
                formula: format!(
                    "contractor_profit_oil = profit_oil * contractor_pct \
                     [rate-of-return tier {}, achieved irr {irr:.4}]",
                    state.ror_tier
                ),
            }
        }
    }
}

/// Advances the rate-of-return tier when the contractor's achieved periodic
/// IRR has crossed the next threshold. Tiers only move forward; returns the
/// achieved IRR used for the check (0 when none is computable yet).
fn advance_ror_tier(state: &mut FiscalState, tiers: &[(f64, f64)], uplift_pct: f64) -> f64 {
    // The uplifted cumulative balance must have turned positive before a
    // return is considered achieved.
    let mut balance = 0.0;
    for &flow in &state.contractor_cash_flows {
        if balance < 0.0 {
            balance *= 1.0 + uplift_pct;
        }
        balance += flow;
    }
    if balance <= 0.0 {
        return 0.0;
    }
    let Some(irr) = periodic_irr(&state.contractor_cash_flows) else {
        return 0.0;
    };
    while state.ror_tier + 1 < tiers.len() && irr >= tiers[state.ror_tier + 1].0 {
        state.ror_tier += 1;
    }
    irr
}

/// Periodic IRR of the flows to date, or `None` when no sign change exists
/// or the solver fails to bracket.
fn periodic_irr(flows: &[f64]) -> Option<f64> {
    let has_negative = flows.iter().any(|&f| f < 0.0);
    let has_positive = flows.iter().any(|&f| f > 0.0);
    if !has_negative || !has_positive {
        return None;
    }
    let npv = |rate: f64| -> f64 {
        flows
            .iter()
            .enumerate()
            .map(|(t, &f)| f / (1.0 + rate).powi(t as i32))
            .sum()
    };
    // Scan for a sign change over a wide rate grid, then polish with Brent.
    let grid: [f64; 8] = [-0.9, -0.5, 0.0, 0.25, 0.5, 1.0, 5.0, 10.0];
    for window in grid.windows(2) {
        let (a, b) = (window[0], window[1]);
        if npv(a) * npv(b) <= 0.0 {
            let solver = BrentSolver::new(SolverConfig::default());
            return solver.find_root(npv, a, b).ok();
        }
    }
    None
}
