//! Service-contract fold.
//!
//! The contractor earns a per-unit fee on production and recovers costs
//! from a capped reimbursement pool; the government keeps the commodity
//! revenue. No royalty, no profit split, no contractor income tax.

use fiscal_core::audit::AuditTrail;
use fiscal_core::types::Unit;
use fiscal_models::regimes::ServiceContract;

use crate::cashflow::CashFlowPeriod;
use crate::revenue::PeriodRevenue;
use crate::state::FiscalState;

use super::StepCosts;

pub(super) fn step(
    terms: &ServiceContract,
    mut state: FiscalState,
    rev: &PeriodRevenue,
    costs: StepCosts,
    trail: &mut AuditTrail,
) -> (FiscalState, CashFlowPeriod) {
    let gross = rev.total;

    let fee = trail.derive(
        "service_fee = volume_boe * fee_per_unit / 1e6",
        rev.volume_boe * terms.fee_per_unit / 1e6,
        Unit::UsdMm,
        &[
            ("volume_boe", rev.volume_boe),
            ("fee_per_unit", terms.fee_per_unit),
        ],
        &[gross.id],
    );

    let opex = trail.input("opex", costs.opex, Unit::UsdMm, None);
    let capex = trail.input("capex", costs.capex, Unit::UsdMm, None);

    // Reimbursement is capped at a fraction of the period's fee; the
    // shortfall carries forward without uplift.
    let pool = state.cost_carry_forward + costs.recoverable;
    let ceiling = fee.value * terms.cost_recovery_ceiling_pct;
    let recovered = trail.derive(
        "cost_recovered = min(cost_pool, service_fee * cost_recovery_ceiling_pct)",
        pool.min(ceiling),
        Unit::UsdMm,
        &[
            ("cost_pool", pool),
            ("service_fee", fee.value),
            ("cost_recovery_ceiling_pct", terms.cost_recovery_ceiling_pct),
        ],
        &[fee.id, opex.id, capex.id],
    );
    state.cost_carry_forward = pool - recovered.value;
    let cost_carry_forward = trail.derive(
        "cost_carry_forward = cost_pool - cost_recovered",
        state.cost_carry_forward,
        Unit::UsdMm,
        &[("cost_pool", pool), ("cost_recovered", recovered.value)],
        &[recovered.id],
    );

    let zero_royalty = trail.input("royalty", 0.0, Unit::UsdMm, None);
    let zero_tax = trail.input("tax", 0.0, Unit::UsdMm, None);

    let ncf_value = fee.value + recovered.value - opex.value - capex.value;
    let net_cash_flow = trail.derive(
        "net_cash_flow = service_fee + cost_recovered - opex - capex",
        ncf_value,
        Unit::UsdMm,
        &[
            ("service_fee", fee.value),
            ("cost_recovered", recovered.value),
            ("opex", opex.value),
            ("capex", capex.value),
        ],
        &[fee.id, recovered.id, opex.id, capex.id],
    );

    let government_take = trail.derive(
        "government_take = gross_revenue - service_fee - cost_recovered",
        gross.value - fee.value - recovered.value,
        Unit::UsdMm,
        &[
            ("gross_revenue", gross.value),
            ("service_fee", fee.value),
            ("cost_recovered", recovered.value),
        ],
        &[gross.id, fee.id, recovered.id],
    );

    state.cum_receipts += fee.value + recovered.value;
    state.cum_expenditures += opex.value + capex.value;
    state.contractor_cash_flows.push(ncf_value);

    let out = CashFlowPeriod {
        index: rev.index,
        gross_revenue: gross,
        royalty: zero_royalty,
        ftp: None,
        cost_recovered: Some(recovered),
        cost_carry_forward: Some(cost_carry_forward),
        contractor_profit_oil: None,
        government_profit_oil: None,
        opex,
        capex,
        depreciation: None,
        tax: zero_tax,
        rrt: None,
        government_take,
        net_cash_flow,
    };
    (state, out)
}
