//! # fiscal_valuation: Valuation & Sensitivity (Layer 4: Application)
//!
//! Reduces post-fiscal cash flow to decision metrics and wraps the whole
//! pipeline behind one library entry point.
//!
//! This crate provides:
//! - NPV over an arbitrary discount-rate list, IRR with explicit
//!   non-convergence outcomes, PV-10 with a caller-declared basis, payback,
//!   and enterprise-value multiples (`valuation`, `irr`)
//! - Rayon-parallel sensitivity sweeps with tornado ordering
//!   (`sensitivity`)
//! - Threshold-driven quality flags (`quality`)
//! - The request/response contract and pipeline wiring (`evaluator`)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            fiscal_valuation (L4)             │
//! ├──────────────────────────────────────────────┤
//! │  evaluator/    - request → response wiring   │
//! │  valuation/    - NPV, PV-10, payback, EV/x   │
//! │  irr/          - bracketed root search       │
//! │  sensitivity/  - parallel tornado sweep      │
//! │  quality/      - threshold flag rules        │
//! └──────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────┐
//! │             fiscal_engine (L3)               │
//! │  gross revenue + regime folds with audit     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! This is the only layer that emits `tracing` events; everything below it
//! is silent, pure computation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod evaluator;
pub mod irr;
pub mod quality;
pub mod sensitivity;
pub mod valuation;

pub use evaluator::{evaluate, EvaluationRequest, EvaluationResponse};
pub use irr::IrrOutcome;
pub use quality::{QualityFlag, Severity, ThresholdTable};
pub use sensitivity::{SensitivityCase, SensitivityRequest, SensitivityVariable};
pub use valuation::{Pv10Basis, PriceBasis, ValuationRequest, ValuationResult};
