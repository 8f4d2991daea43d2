//! Internal rate of return.
//!
//! "No IRR exists" is an expected business outcome, not a failure: an
//! all-positive series (a carried position) or an all-negative one has no
//! root, and a pathological series can defeat the solver's iteration
//! budget. Both cases surface as explicit [`IrrOutcome`] variants; the
//! solver never returns a best-guess root silently.

use serde::{Deserialize, Serialize};

use fiscal_core::math::solvers::{BrentSolver, SolverConfig};
use fiscal_core::types::{PeriodBasis, SolverError};

use crate::valuation::npv;

/// Lower bound of the annual-rate search range.
pub const IRR_RATE_MIN: f64 = -0.99;
/// Upper bound of the annual-rate search range.
pub const IRR_RATE_MAX: f64 = 10.0;

/// Outcome of an IRR solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IrrOutcome {
    /// The solver converged; the annual rate at which NPV = 0.
    Converged {
        /// Annual discount rate, as a fraction
        rate: f64,
    },
    /// The cash-flow series never changes sign, so no root exists.
    NoSignChange,
    /// The solver exhausted its iteration budget without converging.
    NonConvergent {
        /// Iterations spent before giving up
        iterations: usize,
    },
}

impl IrrOutcome {
    /// The converged rate, if any.
    pub fn rate(&self) -> Option<f64> {
        match self {
            IrrOutcome::Converged { rate } => Some(*rate),
            _ => None,
        }
    }
}

/// Solves for the annual IRR of an index-stamped net-cash-flow series.
///
/// Scans `[IRR_RATE_MIN, IRR_RATE_MAX]` on a coarse grid for a sign change
/// in NPV, then polishes the bracket with Brent's method. The solver
/// config's iteration cap is the caller's wall-clock budget; the numeric
/// core has no other time bound.
pub fn internal_rate_of_return(
    flows: &[(usize, f64)],
    basis: PeriodBasis,
    config: SolverConfig<f64>,
) -> IrrOutcome {
    let has_negative = flows.iter().any(|&(_, f)| f < 0.0);
    let has_positive = flows.iter().any(|&(_, f)| f > 0.0);
    if !has_negative || !has_positive {
        return IrrOutcome::NoSignChange;
    }

    let f = |rate: f64| npv(flows, rate, basis);

    // Dense near zero, where real-asset IRRs live; sparse in the tails.
    const GRID: [f64; 14] = [
        IRR_RATE_MIN,
        -0.75,
        -0.5,
        -0.25,
        0.0,
        0.1,
        0.25,
        0.5,
        1.0,
        2.0,
        3.0,
        5.0,
        7.5,
        IRR_RATE_MAX,
    ];
    let max_iterations = config.max_iterations;
    for window in GRID.windows(2) {
        let (a, b) = (window[0], window[1]);
        if f(a) * f(b) > 0.0 {
            continue;
        }
        let solver = BrentSolver::new(config);
        return match solver.find_root(f, a, b) {
            Ok(rate) => IrrOutcome::Converged { rate },
            Err(SolverError::MaxIterationsExceeded { iterations }) => {
                IrrOutcome::NonConvergent { iterations }
            }
            Err(_) => IrrOutcome::NonConvergent {
                iterations: max_iterations,
            },
        };
    }
    // Signs change within the series but NPV keeps one sign over the
    // whole admissible rate range
    IrrOutcome::NoSignChange
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stamped(flows: &[f64]) -> Vec<(usize, f64)> {
        flows.iter().copied().enumerate().collect()
    }

    fn solve(flows: &[f64]) -> IrrOutcome {
        internal_rate_of_return(&stamped(flows), PeriodBasis::Annual, SolverConfig::default())
    }

    #[test]
    fn test_known_two_period_irr() {
        // -100 now, 60 + 60 over two periods: IRR ≈ 13.066%
        let outcome = solve(&[-100.0, 60.0, 60.0]);
        let rate = outcome.rate().unwrap();
        assert_relative_eq!(rate, 0.130_662, epsilon = 1e-5);
        // Root property: NPV at the IRR is zero
        assert_relative_eq!(
            npv(&stamped(&[-100.0, 60.0, 60.0]), rate, PeriodBasis::Annual),
            0.0,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_irr_invariant_under_common_time_shift() {
        // Shifting every flow out by the same number of periods scales NPV
        // by a common discount factor, so the root is unchanged.
        let shifted: Vec<(usize, f64)> = vec![(4, -100.0), (5, 60.0), (6, 60.0)];
        let outcome =
            internal_rate_of_return(&shifted, PeriodBasis::Annual, SolverConfig::default());
        assert_relative_eq!(outcome.rate().unwrap(), 0.130_662, epsilon = 1e-5);
    }

    #[test]
    fn test_all_negative_has_no_sign_change() {
        assert_eq!(solve(&[-10.0, -5.0, -1.0]), IrrOutcome::NoSignChange);
    }

    #[test]
    fn test_all_positive_has_no_sign_change() {
        assert_eq!(solve(&[10.0, 5.0, 1.0]), IrrOutcome::NoSignChange);
    }

    #[test]
    fn test_monthly_basis_returns_annual_rate() {
        // Break even in exactly one year: 12 monthly receipts repay the
        // outlay with zero margin, IRR = 0
        let mut flows = vec![-120.0];
        flows.extend(std::iter::repeat(10.0).take(12));
        let outcome = internal_rate_of_return(
            &stamped(&flows),
            PeriodBasis::Monthly,
            SolverConfig::default(),
        );
        let rate = outcome.rate().unwrap();
        assert_relative_eq!(rate, 0.0, epsilon = 1e-8);
    }
}
