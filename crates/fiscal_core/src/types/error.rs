//! Error types for structured error handling.
//!
//! This module provides:
//! - `CurveError`: invalid decline-curve parameters or series
//! - `DeckError`: price-deck gaps and coverage failures
//! - `RegimeError`: invalid fiscal-regime parameters
//! - `ValuationError`: degenerate valuation inputs
//! - `InterpolationError`: interpolation-table construction failures
//! - `SolverError`: root-finder failures
//! - `EngineError`: top-level aggregate
//!
//! Policy (fail fast): input-validation errors abort the affected evaluation
//! immediately; the engine never substitutes a default assumption. Numeric
//! non-convergence of the IRR solver is *not* an error at the valuation
//! boundary; it is reported as a nullable result with a condition code,
//! because "no IRR exists" is an expected business outcome. `SolverError`
//! only escapes this crate; the valuation layer converts it.
//!
//! Every variant carries enough context (period index, product, regime
//! branch) to reproduce the failure from the audit trail.

use thiserror::Error;

use super::units::Product;

/// Invalid decline-curve parameters or production series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Initial rate must be strictly positive.
    #[error("Invalid curve parameters: initial rate qi = {qi} must be > 0")]
    NonPositiveInitialRate {
        /// Offending initial rate
        qi: f64,
    },

    /// Decline rate must be strictly positive.
    #[error("Invalid curve parameters: decline rate Di = {di} must be > 0")]
    NonPositiveDecline {
        /// Offending decline rate
        di: f64,
    },

    /// Hyperbolic b-factor must lie in [0, 1].
    #[error("Invalid curve parameters: b-factor {b} outside [0, 1]")]
    BFactorOutOfRange {
        /// Offending b-factor
        b: f64,
    },

    /// Explicit series violated an invariant.
    #[error("Invalid production series at period {period}: {reason}")]
    InvalidSeries {
        /// Period index where the violation was detected
        period: usize,
        /// What was violated (ordering, negative volume, ...)
        reason: String,
    },

    /// Profile would be empty (economic limit above the initial rate, or an
    /// empty input series).
    #[error("Production profile is empty: {reason}")]
    EmptyProfile {
        /// Why no periods survived
        reason: String,
    },
}

/// Price-deck lookup and coverage failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeckError {
    /// No deck entry for a (period, product) the profile requires.
    ///
    /// The engine never extrapolates the last known price implicitly.
    #[error("Price deck gap: no {product} price for period {period}")]
    Gap {
        /// Uncovered period index
        period: usize,
        /// Uncovered product stream
        product: Product,
    },

    /// A deck entry carried a non-finite or negative price.
    #[error("Invalid deck entry for {product} at period {period}: price = {price}")]
    InvalidPrice {
        /// Period index of the bad entry
        period: usize,
        /// Product stream of the bad entry
        product: Product,
        /// Offending price
        price: f64,
    },
}

/// Invalid fiscal-regime parameters, rejected at construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegimeError {
    /// A ceiling must lie in (0, 1].
    #[error("Invalid regime parameters: {name} = {value} outside (0, 1]")]
    CeilingOutOfRange {
        /// Parameter name (e.g. "cost_ceiling_pct")
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// A rate or share must lie in [0, 1].
    #[error("Invalid regime parameters: {name} = {value} outside [0, 1]")]
    RateOutOfRange {
        /// Parameter name (e.g. "tax_rate")
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Threshold tables must be strictly increasing.
    #[error("Invalid regime parameters: {table} thresholds not strictly increasing at index {index} ({prev} >= {next})")]
    NonMonotonicThresholds {
        /// Table name (e.g. "r_factor split")
        table: &'static str,
        /// Index of the first out-of-order entry
        index: usize,
        /// Threshold before the violation
        prev: f64,
        /// Violating threshold
        next: f64,
    },

    /// A split/royalty/tier table must have at least one row.
    #[error("Invalid regime parameters: {table} table is empty")]
    EmptyTable {
        /// Table name
        table: &'static str,
    },

    /// A parameter must be strictly positive.
    #[error("Invalid regime parameters: {name} = {value} must be > 0")]
    NonPositive {
        /// Parameter name (e.g. "depreciation_years")
        name: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Degenerate valuation inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// A multiple was requested against a non-positive denominator.
    #[error("Division by zero computing {metric}: denominator = {denominator}")]
    DivisionByZero {
        /// Metric being computed (e.g. "ev_per_ebitda")
        metric: &'static str,
        /// Offending denominator
        denominator: f64,
    },

    /// The cash-flow series was empty.
    #[error("Cannot value an empty cash-flow series")]
    EmptyCashFlow,

    /// A PV-10 scope referenced a period outside the modeled horizon.
    #[error("PV-10 scope references period {period} outside horizon of {horizon} periods")]
    ScopeOutOfRange {
        /// Out-of-range period index
        period: usize,
        /// Number of modeled periods
        horizon: usize,
    },
}

/// Interpolation-table construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// x and y slices had different lengths.
    #[error("xs and ys must have same length: got {xs} and {ys}")]
    MismatchedLengths {
        /// Length of the x slice
        xs: usize,
        /// Length of the y slice
        ys: usize,
    },

    /// Fewer data points than the interpolator requires.
    #[error("Insufficient data: got {got} points, need at least {need}")]
    InsufficientData {
        /// Points supplied
        got: usize,
        /// Minimum required
        need: usize,
    },

    /// x-coordinates were not strictly increasing.
    #[error("x-coordinates not strictly increasing at index {index}")]
    NonIncreasing {
        /// Index of the first out-of-order x
        index: usize,
    },
}

/// Root-finder failures.
///
/// # Examples
/// ```
/// use fiscal_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// `f(a)` and `f(b)` have the same sign; no root is bracketed.
    #[error("No bracket: f({a}) and f({b}) have the same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Iteration produced a non-finite value.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Top-level engine error, aggregating all failure modes.
///
/// # Examples
/// ```
/// use fiscal_core::types::{DeckError, EngineError, Product};
///
/// let err: EngineError = DeckError::Gap { period: 7, product: Product::Gas }.into();
/// assert!(format!("{}", err).contains("period 7"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid decline-curve parameters.
    #[error(transparent)]
    InvalidCurveParameters(#[from] CurveError),

    /// Price-deck gap or bad entry.
    #[error(transparent)]
    PriceDeck(#[from] DeckError),

    /// Invalid regime parameters.
    #[error(transparent)]
    InvalidRegimeParameters(#[from] RegimeError),

    /// Degenerate valuation input (division by zero and friends).
    #[error(transparent)]
    Valuation(#[from] ValuationError),

    /// Root-finder failure that escaped the nullable-IRR boundary.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Interpolation-table construction failure.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// Unknown product code in external input.
    #[error("Unknown product code: {0}")]
    UnknownProduct(String),
}

/// Convenience result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
