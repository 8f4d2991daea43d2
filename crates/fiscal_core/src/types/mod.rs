//! Core value and error types.
//!
//! This module provides:
//! - `units`: product streams, measurement units, and period basis
//! - `volumes`: per-product volume container with boe conversion
//! - `error`: structured error types for curves, decks, regimes, valuation,
//!   and solvers
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Product`], [`Unit`], [`PeriodBasis`] from `units`
//! - [`ProductVolumes`] from `volumes`
//! - [`EngineError`], [`CurveError`], [`DeckError`], [`RegimeError`],
//!   [`ValuationError`], [`SolverError`] from `error`

pub mod error;
pub mod units;
pub mod volumes;

// Re-export commonly used types at module level
pub use error::{
    CurveError, DeckError, EngineError, InterpolationError, RegimeError, SolverError,
    ValuationError,
};
pub use units::{PeriodBasis, Product, Unit};
pub use volumes::ProductVolumes;
