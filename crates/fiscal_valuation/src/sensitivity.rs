//! Parallel sensitivity sweeps with tornado ordering.
//!
//! Each case re-runs the full profile → revenue → fold → valuation chain
//! on a perturbed copy of the base request. Cases share only the read-only
//! base request: every run builds its own `FiscalState` and `AuditTrail`,
//! so the sweep is embarrassingly parallel and resumable at case
//! granularity: an aborted sweep re-runs only the missing cases.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use fiscal_core::audit::AuditTrail;
use fiscal_core::types::{EngineError, Product};
use fiscal_models::production::DeclineCurve;

use crate::evaluator::{run_single, EvaluationRequest, ProductionInput, ProductionSource};
use crate::irr::IrrOutcome;

/// What a sensitivity case perturbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    /// Oil benchmark price
    OilPrice,
    /// Gas benchmark price
    GasPrice,
    /// All production volumes (initial rates for curve forecasts)
    ProductionVolume,
    /// Operating costs
    Opex,
    /// Capital costs
    Capex,
    /// Initial decline rate (no effect on an explicit series)
    DeclineRate,
    /// The requested discount rates themselves
    DiscountRate,
}

impl SensitivityVariable {
    /// Stable label for spans and case output.
    pub fn label(&self) -> &'static str {
        match self {
            SensitivityVariable::OilPrice => "oil_price",
            SensitivityVariable::GasPrice => "gas_price",
            SensitivityVariable::ProductionVolume => "production_volume",
            SensitivityVariable::Opex => "opex",
            SensitivityVariable::Capex => "capex",
            SensitivityVariable::DeclineRate => "decline_rate",
            SensitivityVariable::DiscountRate => "discount_rate",
        }
    }
}

/// One variable and the relative deltas to sweep it over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRequest {
    /// Variable to perturb
    pub variable: SensitivityVariable,
    /// Relative deltas, e.g. `[-0.2, -0.1, 0.1, 0.2]`
    pub deltas: Vec<f64>,
}

/// One completed sensitivity case with its own audit trail.
#[derive(Clone, Debug, Serialize)]
pub struct SensitivityCase {
    /// Perturbed variable; `None` for the base case
    pub variable: Option<SensitivityVariable>,
    /// Relative delta applied
    pub delta: f64,
    /// NPV at the first requested discount rate ($mm)
    pub npv: f64,
    /// NPV less the base case's NPV ($mm)
    pub npv_delta: f64,
    /// IRR outcome under the perturbation
    pub irr: IrrOutcome,
    /// The case's complete, independent audit trail
    pub audit: AuditTrail,
}

/// Runs a sweep: the base case plus one case per `(variable, delta)` pair,
/// in parallel.
///
/// Output order is the base case first, then cases by `|NPV delta|`
/// descending (tornado ordering). Case count is `Σ len(deltas) + 1`.
/// Returns an empty vector when no sweep was requested.
pub fn run_sweep(
    base: &EvaluationRequest,
    requests: &[SensitivityRequest],
) -> Result<Vec<SensitivityCase>, EngineError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let base_run = run_single(base)?;
    let base_npv = base_run.valuation.reference_npv();

    let labels: Vec<(SensitivityVariable, f64)> = requests
        .iter()
        .flat_map(|r| r.deltas.iter().map(move |&delta| (r.variable, delta)))
        .collect();

    let mut cases = labels
        .par_iter()
        .map(|&(variable, delta)| {
            let span =
                tracing::debug_span!("sensitivity_case", variable = variable.label(), delta);
            let _guard = span.enter();

            let perturbed = apply(base, variable, delta)?;
            let run = run_single(&perturbed)?;
            let npv = run.valuation.reference_npv();
            Ok(SensitivityCase {
                variable: Some(variable),
                delta,
                npv,
                npv_delta: npv - base_npv,
                irr: run.valuation.irr,
                audit: run.trail,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    cases.sort_by(|a, b| {
        b.npv_delta
            .abs()
            .partial_cmp(&a.npv_delta.abs())
            .unwrap_or(Ordering::Equal)
    });

    let mut out = Vec::with_capacity(cases.len() + 1);
    out.push(SensitivityCase {
        variable: None,
        delta: 0.0,
        npv: base_npv,
        npv_delta: 0.0,
        irr: base_run.valuation.irr,
        audit: base_run.trail,
    });
    out.extend(cases);
    Ok(out)
}

/// Builds the perturbed request for one case. Always a fresh clone; two
/// cases never share mutable input.
fn apply(
    base: &EvaluationRequest,
    variable: SensitivityVariable,
    delta: f64,
) -> Result<EvaluationRequest, EngineError> {
    let factor = 1.0 + delta;
    let mut request = base.clone();
    request.sensitivity_request.clear();

    match variable {
        SensitivityVariable::OilPrice => {
            request.price_deck = request.price_deck.scaled(Product::Oil, factor);
        }
        SensitivityVariable::GasPrice => {
            request.price_deck = request.price_deck.scaled(Product::Gas, factor);
        }
        SensitivityVariable::Opex => {
            request.cost_structure = request.cost_structure.scaled(factor, 1.0);
        }
        SensitivityVariable::Capex => {
            request.cost_structure = request.cost_structure.scaled(1.0, factor);
        }
        SensitivityVariable::DiscountRate => {
            for rate in &mut request.valuation_request.discount_rates {
                *rate *= factor;
            }
        }
        SensitivityVariable::ProductionVolume => {
            scale_production(&mut request.production, factor, 1.0)?;
        }
        SensitivityVariable::DeclineRate => {
            scale_production(&mut request.production, 1.0, factor)?;
        }
    }
    Ok(request)
}

fn scale_production(
    input: &mut ProductionInput,
    volume_factor: f64,
    decline_factor: f64,
) -> Result<(), EngineError> {
    match &mut input.source {
        ProductionSource::DeclineCurves { curves } => {
            for curve in curves.values_mut() {
                // Rebuild through the constructors so a perturbation that
                // leaves the valid domain fails loudly
                *curve = match *curve {
                    DeclineCurve::Exponential { qi, di } => {
                        DeclineCurve::exponential(qi * volume_factor, di * decline_factor)?
                    }
                    DeclineCurve::Hyperbolic { qi, di, b } => {
                        DeclineCurve::hyperbolic(qi * volume_factor, di * decline_factor, b)?
                    }
                    DeclineCurve::Harmonic { qi, di } => {
                        DeclineCurve::harmonic(qi * volume_factor, di * decline_factor)?
                    }
                };
            }
        }
        ProductionSource::Series { periods } => {
            // An explicit series has no decline parameter to perturb
            for period in periods.iter_mut() {
                period.volumes = period.volumes.scaled(volume_factor);
            }
        }
    }
    Ok(())
}
