//! The library entry point: one request in, one audited response out.
//!
//! Wiring order is fixed: production profile → gross revenue → fiscal fold
//! → valuation → quality flags, with the sensitivity sweep wrapping the
//! same chain once per case. The engine exposes no file format, network
//! protocol, or CLI; the caller hands in structured data and receives
//! structured data back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fiscal_core::audit::AuditTrail;
use fiscal_core::types::{EngineError, PeriodBasis, Product};
use fiscal_engine::cashflow::CashFlowPeriod;
use fiscal_engine::regimes::run_regime;
use fiscal_engine::revenue::gross_revenue;
use fiscal_models::costs::CostStructure;
use fiscal_models::deck::PriceDeck;
use fiscal_models::production::{
    DeclineCurve, ProductionPeriod, ProductionProfile, ProductionProfileBuilder,
};
use fiscal_models::regimes::FiscalRegimeDefinition;

use crate::quality::{evaluate_flags, QualityFlag, ThresholdTable};
use crate::sensitivity::{run_sweep, SensitivityCase, SensitivityRequest};
use crate::valuation::{value_cash_flows, ValuationRequest, ValuationResult};

/// How the production forecast is supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ProductionSource {
    /// Arps decline parameters per product
    DeclineCurves {
        /// One curve per product stream
        curves: BTreeMap<Product, DeclineCurve>,
    },
    /// An explicit per-period volume series (actuals plus forecast)
    Series {
        /// Ordered production periods
        periods: Vec<ProductionPeriod>,
    },
}

/// Production forecast inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionInput {
    /// Period granularity for the whole evaluation
    pub basis: PeriodBasis,
    /// Forecast source
    pub source: ProductionSource,
    /// Economic limit in boe per period; forecast truncates below it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_limit_boe: Option<f64>,
    /// Hard cap on forecast length, periods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_periods: Option<usize>,
    /// Gas-to-boe conversion override (default 6 mcf per boe)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_boe_factor: Option<f64>,
}

impl ProductionInput {
    /// Builds the production profile these inputs describe.
    pub fn build_profile(&self) -> Result<ProductionProfile, EngineError> {
        let mut builder = ProductionProfileBuilder::new(self.basis);
        if let Some(limit) = self.economic_limit_boe {
            builder = builder.with_economic_limit(limit);
        }
        if let Some(max_periods) = self.max_periods {
            builder = builder.with_max_periods(max_periods);
        }
        if let Some(factor) = self.gas_boe_factor {
            builder = builder.with_gas_boe_factor(factor);
        }
        match &self.source {
            ProductionSource::DeclineCurves { curves } => {
                Ok(builder.from_decline_curves(curves)?)
            }
            ProductionSource::Series { periods } => Ok(builder.from_series(periods.clone())?),
        }
    }
}

/// Everything one evaluation needs, provided up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Production forecast inputs
    pub production: ProductionInput,
    /// Commodity price deck
    pub price_deck: PriceDeck,
    /// Operating and capital costs
    pub cost_structure: CostStructure,
    /// Fiscal regime to fold the revenue through
    pub fiscal_regime: FiscalRegimeDefinition,
    /// Valuation metrics to compute
    pub valuation_request: ValuationRequest,
    /// Sensitivity sweep, possibly empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensitivity_request: Vec<SensitivityRequest>,
    /// Quality-flag thresholds; the standard table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdTable>,
}

/// The audited evaluation output.
#[derive(Clone, Debug, Serialize)]
pub struct EvaluationResponse {
    /// Post-fiscal cash flow, one entry per period
    pub cash_flow_periods: Vec<CashFlowPeriod>,
    /// Headline valuation metrics
    pub valuation: ValuationResult,
    /// Threshold breaches
    pub quality_flags: Vec<QualityFlag>,
    /// Sensitivity cases (base case first, then tornado order); empty when
    /// no sweep was requested
    pub sensitivity: Vec<SensitivityCase>,
    /// The base case's audit trail; every audit id in the response above
    /// resolves here (sensitivity cases carry their own trails)
    pub audit: AuditTrail,
}

/// One pipeline pass with a fresh audit trail.
pub(crate) struct SingleRun {
    pub profile: ProductionProfile,
    pub periods: Vec<CashFlowPeriod>,
    pub valuation: ValuationResult,
    pub trail: AuditTrail,
}

pub(crate) fn run_single(request: &EvaluationRequest) -> Result<SingleRun, EngineError> {
    let mut trail = AuditTrail::new();
    let profile = request.production.build_profile()?;
    let revenue = gross_revenue(&profile, &request.price_deck, &mut trail)?;
    let periods = run_regime(
        &request.fiscal_regime,
        &revenue,
        &request.cost_structure,
        &mut trail,
    )?;
    let valuation = value_cash_flows(&periods, &profile, &request.valuation_request, &mut trail)?;
    Ok(SingleRun {
        profile,
        periods,
        valuation,
        trail,
    })
}

/// Runs the full evaluation: base case, quality flags, and (when
/// requested) the sensitivity sweep.
pub fn evaluate(request: &EvaluationRequest) -> Result<EvaluationResponse, EngineError> {
    let span = tracing::info_span!("evaluate", regime = request.fiscal_regime.family());
    let _guard = span.enter();

    let run = run_single(request)?;
    let thresholds = request.thresholds.clone().unwrap_or_default();
    let quality_flags = evaluate_flags(&thresholds, &run.valuation, &run.periods, &run.profile);
    let sensitivity = run_sweep(request, &request.sensitivity_request)?;

    tracing::info!(
        periods = run.periods.len(),
        flags = quality_flags.len(),
        sensitivity_cases = sensitivity.len(),
        "evaluation complete"
    );

    Ok(EvaluationResponse {
        cash_flow_periods: run.periods,
        valuation: run.valuation,
        quality_flags,
        sensitivity,
        audit: run.trail,
    })
}

/// Convenience constructor for a decline-curve production source.
pub fn decline_curves(
    curves: impl IntoIterator<Item = (Product, DeclineCurve)>,
) -> ProductionSource {
    ProductionSource::DeclineCurves {
        curves: curves.into_iter().collect(),
    }
}
