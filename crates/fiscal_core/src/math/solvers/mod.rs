//! Root-finding solvers.
//!
//! This module provides the bracketing root finder used to extract IRR from a
//! net-cash-flow series. Brent's method was chosen over plain Newton because
//! NPV-vs-rate curves can have near-flat regions where a derivative-based
//! step diverges; a maintained bracket cannot escape the search range.
//!
//! ## Configuration
//!
//! [`SolverConfig`] carries:
//! - `tolerance`: convergence tolerance (default: 1e-10)
//! - `max_iterations`: maximum iteration count (default: 100). This is the
//!   engine's only bounded-time guarantee, so callers with a wall-clock
//!   budget tighten it here.
//!
//! ## Example
//!
//! ```
//! use fiscal_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! // Solve x² - 2 = 0 in bracket [0, 2]
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod brent;
mod config;

// Re-export public types at module level
pub use brent::BrentSolver;
pub use config::SolverConfig;
