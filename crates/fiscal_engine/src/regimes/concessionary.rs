//! Concessionary (royalty/tax) fold.

use fiscal_core::audit::AuditTrail;
use fiscal_core::types::Unit;
use fiscal_models::costs::CostStructure;
use fiscal_models::regimes::Concessionary;

use crate::cashflow::CashFlowPeriod;
use crate::revenue::PeriodRevenue;
use crate::state::FiscalState;

use super::StepCosts;

/// Straight-line depreciation charge per modeled period, aligned to the
/// revenue series.
///
/// Each capital item is uplifted by the regime's investment uplift and
/// spread evenly over `depreciation_periods` starting in the period the
/// spend lands. Any balance still undepreciated when the modeled horizon
/// ends is written off in the final period, so the tax base sees the full
/// uplifted cost within the run.
pub(super) fn depreciation_schedule(
    costs: &CostStructure,
    revenue: &[PeriodRevenue],
    terms: &Concessionary,
) -> Vec<f64> {
    let mut schedule = vec![0.0; revenue.len()];
    if revenue.is_empty() {
        return schedule;
    }
    let life = terms.depreciation_periods.max(1);
    let horizon = revenue[revenue.len() - 1].index;

    for item in costs.capital() {
        if item.period > horizon {
            continue;
        }
        let depreciable = item.amount * (1.0 + terms.uplift_pct);
        let charge = depreciable / life as f64;
        let mut taken = 0.0;
        for (i, rev) in revenue.iter().enumerate() {
            if rev.index >= item.period && rev.index < item.period + life {
                schedule[i] += charge;
                taken += charge;
            }
        }
        let remainder = depreciable - taken;
        if remainder > 0.0 {
            schedule[revenue.len() - 1] += remainder;
        }
    }
    schedule
}

/// One period of the concessionary fold.
///
/// Order of operations: royalty off gross, then taxable income (revenue
/// less royalty, opex, and depreciation) with loss carry-forward or a
/// ring-fence clamp, then income tax, then resource rent tax on the
/// project's augmented-cost balance.
pub(super) fn step(
    terms: &Concessionary,
    mut state: FiscalState,
    rev: &PeriodRevenue,
    costs: StepCosts,
    depreciation_charge: f64,
    trail: &mut AuditTrail,
) -> (FiscalState, CashFlowPeriod) {
    let gross = rev.total;

    let (royalty_rate, rate_desc) = terms
        .royalty
        .rate_for(rev.realised_price_boe, rev.volume_boe);
    let royalty = trail.derive(
        &format!("royalty = gross_revenue * royalty_rate [{rate_desc}]"),
        gross.value * royalty_rate,
        Unit::UsdMm,
        &[
            ("gross_revenue", gross.value),
            ("royalty_rate", royalty_rate),
        ],
        &[gross.id],
    );

    let opex = trail.input("opex", costs.opex, Unit::UsdMm, None);
    let capex = trail.input("capex", costs.capex, Unit::UsdMm, None);
    let depreciation = trail.derive(
        "depreciation = straight_line(capex * (1 + uplift_pct), depreciation_periods)",
        depreciation_charge,
        Unit::UsdMm,
        &[
            ("charge", depreciation_charge),
            ("uplift_pct", terms.uplift_pct),
            ("depreciation_periods", terms.depreciation_periods as f64),
        ],
        &[capex.id],
    );

    let ti_raw = gross.value - royalty.value - opex.value - depreciation.value;
    let lcf_prev = state.loss_carry_forward;
    let (taxable, lcf_next, ti_formula) = if terms.ring_fenced {
        // Ring-fenced: losses never leave the period
        (ti_raw.max(0.0), 0.0, "taxable_income = max(0, gross_revenue - royalty - opex - depreciation) [ring-fenced]")
    } else {
        let after_losses = ti_raw - lcf_prev;
        if after_losses < 0.0 {
            (0.0, -after_losses, "taxable_income = max(0, gross_revenue - royalty - opex - depreciation - loss_carry_forward)")
        } else {
            (after_losses, 0.0, "taxable_income = gross_revenue - royalty - opex - depreciation - loss_carry_forward")
        }
    };
    let taxable = trail.derive(
        ti_formula,
        taxable,
        Unit::UsdMm,
        &[
            ("gross_revenue", gross.value),
            ("royalty", royalty.value),
            ("opex", opex.value),
            ("depreciation", depreciation.value),
            ("loss_carry_forward", lcf_prev),
        ],
        &[gross.id, royalty.id, opex.id, depreciation.id],
    );
    state.loss_carry_forward = lcf_next;

    let tax = trail.derive(
        "tax = taxable_income * tax_rate",
        taxable.value * terms.tax_rate,
        Unit::UsdMm,
        &[
            ("taxable_income", taxable.value),
            ("tax_rate", terms.tax_rate),
        ],
        &[taxable.id],
    );

    // Resource rent tax: receipts net of royalty against the augmented
    // (uplifted) undeducted cost balance.
    let rrt = terms.rrt.as_ref().map(|params| {
        let receipts = gross.value - royalty.value;
        let augmented =
            state.rrt_undeducted * (1.0 + params.uplift_rate) + opex.value + capex.value;
        let excess = (receipts - augmented).max(0.0);
        state.rrt_undeducted = (augmented - receipts).max(0.0);
        trail.derive(
            "rrt = rrt_rate * max(0, receipts - augmented_costs)",
            params.rate * excess,
            Unit::UsdMm,
            &[
                ("receipts", receipts),
                ("augmented_costs", augmented),
                ("rrt_rate", params.rate),
                ("rrt_uplift_rate", params.uplift_rate),
            ],
            &[gross.id, royalty.id, opex.id, capex.id],
        )
    });
    let rrt_value = rrt.map_or(0.0, |a| a.value);

    let ncf_value =
        gross.value - royalty.value - opex.value - capex.value - tax.value - rrt_value;
    let net_cash_flow = trail.derive(
        "net_cash_flow = gross_revenue - royalty - opex - capex - tax - rrt",
        ncf_value,
        Unit::UsdMm,
        &[
            ("gross_revenue", gross.value),
            ("royalty", royalty.value),
            ("opex", opex.value),
            ("capex", capex.value),
            ("tax", tax.value),
            ("rrt", rrt_value),
        ],
        &[gross.id, royalty.id, opex.id, capex.id, tax.id],
    );

    let government_take = trail.derive(
        "government_take = royalty + tax + rrt",
        royalty.value + tax.value + rrt_value,
        Unit::UsdMm,
        &[
            ("royalty", royalty.value),
            ("tax", tax.value),
            ("rrt", rrt_value),
        ],
        &[royalty.id, tax.id],
    );

    state.cum_receipts += gross.value - royalty.value;
    state.cum_expenditures += opex.value + capex.value;
    state.contractor_cash_flows.push(ncf_value);

    let out = CashFlowPeriod {
        index: rev.index,
        gross_revenue: gross,
        royalty,
        ftp: None,
        cost_recovered: None,
        cost_carry_forward: None,
        contractor_profit_oil: None,
        government_profit_oil: None,
        opex,
        capex,
        depreciation: Some(depreciation),
        tax,
        rrt,
        government_take,
        net_cash_flow,
    };
    (state, out)
}
