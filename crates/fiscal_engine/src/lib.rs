//! # fiscal_engine: The Fiscal Kernel
//!
//! ## Layer 3 (Kernel) Role
//!
//! This crate turns a production profile, price deck, cost structure, and
//! fiscal regime definition into per-period post-fiscal cash flow:
//! - `revenue`: gross revenue per period per product (pure)
//! - `state`: [`state::FiscalState`], the per-run carry-forward ledger
//! - `cashflow`: [`cashflow::CashFlowPeriod`] outputs with audit records
//! - `regimes`: the period-stepping folds for concessionary,
//!   production-sharing, and service-contract regimes
//!
//! ## The fold
//!
//! Each regime family is an explicit fold `(state, period inputs) ->
//! (state', CashFlowPeriod)`: state is moved in and a new state moved out,
//! previous period values are never mutated, and one run owns one state.
//! Re-running a sensitivity case is therefore trivially side-effect-free:
//! there is no instance field anywhere to reset.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use fiscal_core::audit::AuditTrail;
//! use fiscal_core::types::{PeriodBasis, Product};
//! use fiscal_models::costs::CostStructure;
//! use fiscal_models::deck::PriceDeck;
//! use fiscal_models::production::{DeclineCurve, ProductionProfileBuilder};
//! use fiscal_models::regimes::{Concessionary, FiscalRegimeDefinition, RoyaltySchedule};
//! use fiscal_engine::revenue::gross_revenue;
//! use fiscal_engine::regimes::run_regime;
//!
//! let mut curves = BTreeMap::new();
//! curves.insert(Product::Oil, DeclineCurve::exponential(365_000.0, 0.1).unwrap());
//! let profile = ProductionProfileBuilder::new(PeriodBasis::Annual)
//!     .with_max_periods(10)
//!     .from_decline_curves(&curves)
//!     .unwrap();
//! let deck = PriceDeck::flat(&[(Product::Oil, 70.0, 0.0)], 10).unwrap();
//!
//! let regime = FiscalRegimeDefinition::Concessionary(Concessionary {
//!     royalty: RoyaltySchedule::Flat { rate: 0.125 },
//!     tax_rate: 0.21,
//!     uplift_pct: 0.0,
//!     depreciation_periods: 5,
//!     rrt: None,
//!     ring_fenced: false,
//! });
//!
//! let mut trail = AuditTrail::new();
//! let revenue = gross_revenue(&profile, &deck, &mut trail).unwrap();
//! let periods = run_regime(&regime, &revenue, &CostStructure::default(), &mut trail).unwrap();
//! assert_eq!(periods.len(), 10);
//! assert!(periods[0].net_cash_flow.value > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod cashflow;
pub mod regimes;
pub mod revenue;
pub mod state;
