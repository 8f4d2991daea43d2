//! The fiscal state machine: one fold per regime family.
//!
//! [`run_regime`] validates the regime definition, creates a fresh
//! [`FiscalState`](crate::state::FiscalState), and folds the revenue series
//! through the family's step function in strict period order. Dispatch is a
//! flat match on the regime enum; the three families share almost no
//! behaviour, and a closed switch keeps each family's stepping logic
//! auditable in one place.

mod concessionary;
mod psc;
mod service;

use fiscal_core::audit::AuditTrail;
use fiscal_core::types::EngineError;
use fiscal_models::costs::CostStructure;
use fiscal_models::regimes::FiscalRegimeDefinition;

use crate::cashflow::CashFlowPeriod;
use crate::revenue::PeriodRevenue;
use crate::state::FiscalState;

/// Costs attributed to one period of the fold ($mm).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StepCosts {
    /// Total operating cost
    pub opex: f64,
    /// Total capital spend landing this period
    pub capex: f64,
    /// Cost-recoverable spend entering the PSC/service recovery pool
    pub recoverable: f64,
}

impl StepCosts {
    fn for_period(costs: &CostStructure, period: usize) -> Self {
        Self {
            opex: costs.opex_for(period),
            capex: costs.capex_for(period),
            recoverable: costs.recoverable_for(period),
        }
    }
}

/// Runs the full fiscal fold for one regime over a revenue series.
///
/// Periods are processed strictly in order; the state is created fresh here
/// and dropped when the run ends, so concurrent runs can never observe each
/// other. Every period output carries audit records naming the sub-formula
/// and, for split selections, the threshold band used.
pub fn run_regime(
    regime: &FiscalRegimeDefinition,
    revenue: &[PeriodRevenue],
    costs: &CostStructure,
    trail: &mut AuditTrail,
) -> Result<Vec<CashFlowPeriod>, EngineError> {
    regime.validate()?;

    let mut state = FiscalState::new();
    let mut periods = Vec::with_capacity(revenue.len());

    match regime {
        FiscalRegimeDefinition::Concessionary(terms) => {
            let depreciation = concessionary::depreciation_schedule(costs, revenue, terms);
            for (i, rev) in revenue.iter().enumerate() {
                let step_costs = StepCosts::for_period(costs, rev.index);
                let (next, out) = concessionary::step(
                    terms,
                    state,
                    rev,
                    step_costs,
                    depreciation[i],
                    trail,
                );
                state = next;
                periods.push(out);
            }
        }
        FiscalRegimeDefinition::ProductionSharing(terms) => {
            for rev in revenue {
                let step_costs = StepCosts::for_period(costs, rev.index);
                let (next, out) = psc::step(terms, state, rev, step_costs, trail);
                state = next;
                periods.push(out);
            }
        }
        FiscalRegimeDefinition::ServiceContract(terms) => {
            for rev in revenue {
                let step_costs = StepCosts::for_period(costs, rev.index);
                let (next, out) = service::step(terms, state, rev, step_costs, trail);
                state = next;
                periods.push(out);
            }
        }
    }

    Ok(periods)
}
