//! # fiscal_core: Foundation for the Upstream Fiscal & Valuation Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! fiscal_core is the bottom layer of the 4-layer architecture, providing:
//! - Shared value types: `Product`, `Unit`, `PeriodBasis`, `ProductVolumes` (`types`)
//! - Structured error taxonomy: `EngineError` and per-concern enums (`types::error`)
//! - Root solvers for IRR extraction (`math::solvers`)
//! - Linear interpolation for split tables and price bases (`math::interpolate`)
//! - Adaptive quadrature for decline-curve integration (`math::integrate`)
//! - The audit-trail value types `Audited<T>` / `AuditRecord` (`audit`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other fiscal_* crates, with minimal external
//! dependencies:
//! - num-traits: traits for generic numerical computation
//! - thiserror: structured error derives
//! - serde: serialisation of value types and audit records
//!
//! ## Determinism
//!
//! Nothing in this crate performs I/O, reads clocks, or draws randomness.
//! Every function is a pure computation over its arguments, so any value the
//! upper layers produce can be reproduced exactly from its audit record.
//!
//! ## Usage Example
//!
//! ```rust
//! use fiscal_core::math::solvers::{BrentSolver, SolverConfig};
//! use fiscal_core::types::{Product, Unit};
//!
//! // Root finding (the IRR backend)
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
//!
//! // Value types
//! assert_eq!(Product::Oil.code(), "oil");
//! assert_eq!(Unit::UsdMm.symbol(), "$mm");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod audit;
pub mod math;
pub mod types;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
