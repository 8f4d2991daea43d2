//! Adaptive quadrature.
//!
//! Hyperbolic decline curves have no closed-form cumulative volume for
//! general `b`, so EUR falls back to numerical integration to a caller
//! tolerance. Adaptive Simpson is exact for cubics on each panel and splits
//! only where the integrand still bends, which suits decline curves: steep
//! early, nearly flat in the tail.

use num_traits::Float;

/// Maximum recursion depth for adaptive refinement.
///
/// 40 halvings take a panel below any representable width; hitting this
/// bound means the tolerance is tighter than f64 resolution and the current
/// estimate is returned.
const MAX_DEPTH: usize = 40;

/// Integrate `f` over `[a, b]` by adaptive Simpson to absolute tolerance `tol`.
///
/// # Example
///
/// ```
/// use fiscal_core::math::integrate::adaptive_simpson;
///
/// // ∫₀¹ x² dx = 1/3
/// let v = adaptive_simpson(|x: f64| x * x, 0.0, 1.0, 1e-10);
/// assert!((v - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn adaptive_simpson<T, F>(f: F, a: T, b: T, tol: T) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let two = T::from(2.0).unwrap();
    let c = (a + b) / two;
    let fa = f(a);
    let fb = f(b);
    let fc = f(c);
    let whole = simpson_panel(a, b, fa, fc, fb);
    recurse(&f, a, b, fa, fb, fc, whole, tol, MAX_DEPTH)
}

/// Simpson's rule on one panel: `(b - a) / 6 * (fa + 4 fc + fb)`.
#[inline]
fn simpson_panel<T: Float>(a: T, b: T, fa: T, fc: T, fb: T) -> T {
    let four = T::from(4.0).unwrap();
    let six = T::from(6.0).unwrap();
    (b - a) / six * (fa + four * fc + fb)
}

#[allow(clippy::too_many_arguments)]
fn recurse<T, F>(f: &F, a: T, b: T, fa: T, fb: T, fc: T, whole: T, tol: T, depth: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let two = T::from(2.0).unwrap();
    let fifteen = T::from(15.0).unwrap();

    let c = (a + b) / two;
    let d = (a + c) / two;
    let e = (c + b) / two;
    let fd = f(d);
    let fe = f(e);

    let left = simpson_panel(a, c, fa, fd, fc);
    let right = simpson_panel(c, b, fc, fe, fb);
    let split = left + right;
    let err = split - whole;

    // Richardson: Simpson error shrinks 15x per halving
    if depth == 0 || err.abs() <= fifteen * tol {
        return split + err / fifteen;
    }

    let half_tol = tol / two;
    recurse(f, a, c, fa, fc, fd, left, half_tol, depth - 1)
        + recurse(f, c, b, fc, fb, fe, right, half_tol, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_exact() {
        // Simpson is exact for cubics
        let v = adaptive_simpson(|x: f64| x * x * x, 0.0, 2.0, 1e-12);
        assert_relative_eq!(v, 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_exponential_decay() {
        // ∫₀¹⁰ e^(-x) dx = 1 - e^(-10)
        let v = adaptive_simpson(|x: f64| (-x).exp(), 0.0, 10.0, 1e-10);
        assert_relative_eq!(v, 1.0 - (-10.0_f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn test_hyperbolic_decline_shape() {
        // q(t) = qi / (1 + b*Di*t)^(1/b) with qi=100, Di=0.1, b=0.5
        // Closed form: qi / (Di*(1-b)) * (1 - (1 + b*Di*t)^(1 - 1/b))
        let (qi, di, b) = (100.0_f64, 0.1, 0.5);
        let q = |t: f64| qi / (1.0 + b * di * t).powf(1.0 / b);
        let t_end = 50.0;

        let closed =
            qi / (di * (1.0 - b)) * (1.0 - (1.0 + b * di * t_end).powf(1.0 - 1.0 / b));
        let numeric = adaptive_simpson(q, 0.0, t_end, 1e-9);
        assert_relative_eq!(numeric, closed, epsilon = 1e-6);
    }

    #[test]
    fn test_reversed_interval_is_negative() {
        let fwd = adaptive_simpson(|x: f64| x, 0.0, 1.0, 1e-10);
        let rev = adaptive_simpson(|x: f64| x, 1.0, 0.0, 1e-10);
        assert_relative_eq!(fwd, -rev, epsilon = 1e-10);
    }
}
