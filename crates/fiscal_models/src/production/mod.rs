//! Production forecasting: Arps decline curves and the profile builder.
//!
//! This module provides:
//! - [`DeclineCurve`]: exponential / hyperbolic / harmonic rate models with
//!   validated parameters, closed-form or numerical cumulative volumes
//! - [`ProductionProfileBuilder`]: converts decline parameters or an
//!   explicit series into an ordered, economic-limit-truncated
//!   [`ProductionProfile`]
//!
//! # Re-exports
//!
//! - [`DeclineCurve`] from `decline`
//! - [`PeriodKind`], [`ProductionPeriod`], [`ProductionProfile`],
//!   [`ProductionProfileBuilder`], [`Truncation`] from `profile`

mod decline;
mod profile;

pub use decline::DeclineCurve;
pub use profile::{
    PeriodKind, ProductionPeriod, ProductionProfile, ProductionProfileBuilder, Truncation,
};
