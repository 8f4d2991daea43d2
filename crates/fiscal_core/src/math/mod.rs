//! Numerical machinery shared by the upper layers.
//!
//! This module provides:
//! - `solvers`: root finding (the IRR backend)
//! - `interpolate`: sorted-table linear interpolation (split tables,
//!   trailing-average price bases)
//! - `integrate`: adaptive quadrature (hyperbolic decline-curve volumes)
//!
//! All routines are generic over `T: num_traits::Float` and perform no
//! allocation beyond their input tables.

pub mod integrate;
pub mod interpolate;
pub mod solvers;
