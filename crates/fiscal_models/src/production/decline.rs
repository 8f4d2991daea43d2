//! Arps decline-curve models.

use serde::{Deserialize, Serialize};

use fiscal_core::math::integrate::adaptive_simpson;
use fiscal_core::types::CurveError;

/// Below this, a hyperbolic b-factor is treated as exactly zero and the
/// exponential closed form is used directly. The hyperbolic expression
/// raises to the power `1/b`, so evaluating it near `b = 0` is a division
/// by (almost) zero in the exponent; the curve families are continuous in
/// `b`, so collapsing to the limit form is exact to within the epsilon.
const EPS_B: f64 = 1e-9;

/// An Arps decline curve with validated parameters.
///
/// Rates are in volume per period (on whatever [`fiscal_core::types::PeriodBasis`]
/// the evaluation declares); `t` is the period index as a float.
///
/// # Variants
///
/// - `Exponential`: `q(t) = qi · e^(−Di·t)`
/// - `Hyperbolic`: `q(t) = qi / (1 + b·Di·t)^(1/b)`, `b ∈ [0, 1]`;
///   `b = 0` degenerates to exponential and `b = 1` to harmonic, both
///   handled through the same expression (no branch, no divide-by-zero;
///   see [`EPS_B`])
/// - `Harmonic`: `q(t) = qi / (1 + Di·t)`
///
/// # Examples
///
/// ```
/// use fiscal_models::production::DeclineCurve;
///
/// let curve = DeclineCurve::exponential(1_000.0, 0.10).unwrap();
/// assert!((curve.rate(0.0) - 1_000.0).abs() < 1e-9);
/// assert!(curve.rate(12.0) < 1_000.0);
///
/// // Invalid parameters are rejected at construction
/// assert!(DeclineCurve::exponential(-1.0, 0.10).is_err());
/// assert!(DeclineCurve::hyperbolic(1_000.0, 0.10, 1.5).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeclineCurve {
    /// Constant-percentage decline.
    Exponential {
        /// Initial rate (volume per period)
        qi: f64,
        /// Nominal decline rate per period
        di: f64,
    },
    /// Arps hyperbolic decline with b-factor.
    Hyperbolic {
        /// Initial rate (volume per period)
        qi: f64,
        /// Initial nominal decline rate per period
        di: f64,
        /// Hyperbolic exponent, in [0, 1]
        b: f64,
    },
    /// Harmonic decline (hyperbolic with b = 1).
    Harmonic {
        /// Initial rate (volume per period)
        qi: f64,
        /// Initial nominal decline rate per period
        di: f64,
    },
}

impl DeclineCurve {
    /// Creates a validated exponential decline.
    pub fn exponential(qi: f64, di: f64) -> Result<Self, CurveError> {
        validate_qi_di(qi, di)?;
        Ok(DeclineCurve::Exponential { qi, di })
    }

    /// Creates a validated hyperbolic decline.
    ///
    /// `b` must lie in `[0, 1]`; the endpoints are legal and collapse to the
    /// exponential and harmonic families.
    pub fn hyperbolic(qi: f64, di: f64, b: f64) -> Result<Self, CurveError> {
        validate_qi_di(qi, di)?;
        if !(0.0..=1.0).contains(&b) || !b.is_finite() {
            return Err(CurveError::BFactorOutOfRange { b });
        }
        Ok(DeclineCurve::Hyperbolic { qi, di, b })
    }

    /// Creates a validated harmonic decline.
    pub fn harmonic(qi: f64, di: f64) -> Result<Self, CurveError> {
        validate_qi_di(qi, di)?;
        Ok(DeclineCurve::Harmonic { qi, di })
    }

    /// Initial rate `qi`.
    pub fn initial_rate(&self) -> f64 {
        match *self {
            DeclineCurve::Exponential { qi, .. }
            | DeclineCurve::Hyperbolic { qi, .. }
            | DeclineCurve::Harmonic { qi, .. } => qi,
        }
    }

    /// Initial decline rate `Di` per period.
    pub fn initial_decline(&self) -> f64 {
        match *self {
            DeclineCurve::Exponential { di, .. }
            | DeclineCurve::Hyperbolic { di, .. }
            | DeclineCurve::Harmonic { di, .. } => di,
        }
    }

    /// Rate at time `t` (periods).
    pub fn rate(&self, t: f64) -> f64 {
        match *self {
            DeclineCurve::Exponential { qi, di } => qi * (-di * t).exp(),
            DeclineCurve::Hyperbolic { qi, di, b } => {
                if b < EPS_B {
                    qi * (-di * t).exp()
                } else {
                    qi / (1.0 + b * di * t).powf(1.0 / b)
                }
            }
            DeclineCurve::Harmonic { qi, di } => qi / (1.0 + di * t),
        }
    }

    /// Cumulative volume from time 0 to `t` (periods).
    ///
    /// Closed-form integration where available (exponential, harmonic, and
    /// hyperbolic at the epsilon-collapsed endpoints); adaptive Simpson to
    /// absolute tolerance `tol` for the general hyperbolic case.
    pub fn cumulative_to(&self, t: f64, tol: f64) -> f64 {
        match *self {
            DeclineCurve::Exponential { qi, di } => qi / di * (1.0 - (-di * t).exp()),
            DeclineCurve::Harmonic { qi, di } => qi / di * (1.0 + di * t).ln(),
            DeclineCurve::Hyperbolic { qi, di, b } => {
                if b < EPS_B {
                    qi / di * (1.0 - (-di * t).exp())
                } else if (b - 1.0).abs() < EPS_B {
                    qi / di * (1.0 + di * t).ln()
                } else {
                    adaptive_simpson(|x| self.rate(x), 0.0, t, tol)
                }
            }
        }
    }

    /// Estimated ultimate recovery: cumulative volume from time 0 to the
    /// economic limit `q_limit`, by [`Self::cumulative_to`].
    ///
    /// Returns `None` when the limit is never reached (`q_limit <= 0`).
    pub fn eur_to_limit(&self, q_limit: f64, tol: f64) -> Option<f64> {
        self.time_to_rate(q_limit)
            .map(|t| self.cumulative_to(t, tol))
    }

    /// Time (periods) at which the rate first falls to `q_limit`, or `None`
    /// if `q_limit >= qi` (sub-economic from the start) or `q_limit <= 0`
    /// (never reached).
    pub fn time_to_rate(&self, q_limit: f64) -> Option<f64> {
        if q_limit <= 0.0 {
            return None;
        }
        let qi = self.initial_rate();
        if q_limit >= qi {
            return Some(0.0);
        }
        let ratio = qi / q_limit;
        let t = match *self {
            DeclineCurve::Exponential { di, .. } => ratio.ln() / di,
            DeclineCurve::Harmonic { di, .. } => (ratio - 1.0) / di,
            DeclineCurve::Hyperbolic { di, b, .. } => {
                if b < EPS_B {
                    ratio.ln() / di
                } else {
                    (ratio.powf(b) - 1.0) / (b * di)
                }
            }
        };
        Some(t)
    }
}

fn validate_qi_di(qi: f64, di: f64) -> Result<(), CurveError> {
    if qi <= 0.0 || !qi.is_finite() {
        return Err(CurveError::NonPositiveInitialRate { qi });
    }
    if di <= 0.0 || !di.is_finite() {
        return Err(CurveError::NonPositiveDecline { di });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_exponential_rate() {
        let c = DeclineCurve::exponential(1000.0, 0.1).unwrap();
        assert_relative_eq!(c.rate(0.0), 1000.0);
        assert_relative_eq!(c.rate(10.0), 1000.0 * (-1.0_f64).exp());
    }

    #[test]
    fn test_hyperbolic_b_zero_matches_exponential() {
        let hyp = DeclineCurve::hyperbolic(1000.0, 0.1, 0.0).unwrap();
        let exp = DeclineCurve::exponential(1000.0, 0.1).unwrap();
        for t in [0.0, 1.0, 5.0, 25.0] {
            assert_relative_eq!(hyp.rate(t), exp.rate(t), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_hyperbolic_b_one_matches_harmonic() {
        let hyp = DeclineCurve::hyperbolic(1000.0, 0.1, 1.0).unwrap();
        let har = DeclineCurve::harmonic(1000.0, 0.1).unwrap();
        for t in [0.0, 1.0, 5.0, 25.0] {
            assert_relative_eq!(hyp.rate(t), har.rate(t), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            DeclineCurve::exponential(0.0, 0.1),
            Err(CurveError::NonPositiveInitialRate { .. })
        ));
        assert!(matches!(
            DeclineCurve::exponential(1000.0, -0.1),
            Err(CurveError::NonPositiveDecline { .. })
        ));
        assert!(matches!(
            DeclineCurve::hyperbolic(1000.0, 0.1, -0.01),
            Err(CurveError::BFactorOutOfRange { .. })
        ));
        assert!(matches!(
            DeclineCurve::hyperbolic(1000.0, 0.1, 1.01),
            Err(CurveError::BFactorOutOfRange { .. })
        ));
    }

    #[test]
    fn test_time_to_rate_inverts_rate() {
        let curves = [
            DeclineCurve::exponential(1000.0, 0.08).unwrap(),
            DeclineCurve::harmonic(1000.0, 0.08).unwrap(),
            DeclineCurve::hyperbolic(1000.0, 0.08, 0.5).unwrap(),
        ];
        for c in curves {
            let t = c.time_to_rate(50.0).unwrap();
            assert_relative_eq!(c.rate(t), 50.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_time_to_rate_edge_cases() {
        let c = DeclineCurve::exponential(100.0, 0.1).unwrap();
        assert_eq!(c.time_to_rate(0.0), None);
        assert_eq!(c.time_to_rate(150.0), Some(0.0));
    }

    #[test]
    fn test_harmonic_cumulative_closed_form() {
        let c = DeclineCurve::harmonic(1000.0, 0.1).unwrap();
        // qi/Di * ln(1 + Di*t)
        assert_relative_eq!(
            c.cumulative_to(10.0, 1e-9),
            10_000.0 * 2.0_f64.ln(),
            epsilon = 1e-6
        );
    }

    proptest! {
        /// Closed-form cumulative equals numerical
        /// integration within a tight tolerance, for all valid exponential
        /// parameters.
        #[test]
        fn prop_exponential_closed_form_matches_quadrature(
            qi in 1.0_f64..50_000.0,
            di in 0.001_f64..0.5,
            t in 0.1_f64..360.0,
        ) {
            let c = DeclineCurve::exponential(qi, di).unwrap();
            let closed = c.cumulative_to(t, 1e-10);
            let numeric = fiscal_core::math::integrate::adaptive_simpson(
                |x| c.rate(x), 0.0, t, 1e-10,
            );
            prop_assert!((closed - numeric).abs() <= 1e-6 * closed.max(1.0));
        }

        /// Hyperbolic rates are positive and non-increasing in t.
        #[test]
        fn prop_hyperbolic_monotone_decline(
            qi in 1.0_f64..50_000.0,
            di in 0.001_f64..0.5,
            b in 0.0_f64..=1.0,
            t in 0.0_f64..240.0,
        ) {
            let c = DeclineCurve::hyperbolic(qi, di, b).unwrap();
            let q0 = c.rate(t);
            let q1 = c.rate(t + 1.0);
            prop_assert!(q0 > 0.0);
            prop_assert!(q1 <= q0 + 1e-12);
        }
    }
}
