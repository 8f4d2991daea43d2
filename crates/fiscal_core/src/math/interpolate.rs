//! Piecewise linear interpolation over a sorted threshold table.

use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over strictly increasing x-coordinates.
///
/// This is the mechanism behind interpolated R-Factor split tables and the
/// trailing-average price basis: both are ordered `(threshold, value)`
/// tables queried with a scalar. Outside the table domain the interpolator
/// **clamps** to the boundary value rather than extrapolating: a contractor
/// share must stay within `[min_pct, max_pct]` no matter how far R runs past
/// the last threshold.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use fiscal_core::math::interpolate::LinearInterpolator;
///
/// // Contractor share sliding from 60% at R=1.0 to 40% at R=2.0
/// let interp = LinearInterpolator::new(&[1.0f64, 2.0], &[0.60, 0.40]).unwrap();
/// assert!((interp.eval(1.5) - 0.50).abs() < 1e-12);
/// // Clamped outside the table
/// assert_eq!(interp.eval(0.2), 0.60);
/// assert_eq!(interp.eval(9.0), 0.40);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    /// Strictly increasing x-coordinates
    xs: Vec<T>,
    /// Corresponding y-values
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct an interpolator from x and y data points.
    ///
    /// Unlike a general-purpose interpolator this constructor does not sort:
    /// threshold tables are required to be strictly increasing as supplied,
    /// and a misordered table is a regime-definition defect the caller must
    /// see, not a reorderable input.
    ///
    /// # Returns
    ///
    /// * `Ok(LinearInterpolator)` on success
    /// * `Err(InterpolationError::MismatchedLengths)` if slice lengths differ
    /// * `Err(InterpolationError::InsufficientData)` if fewer than 1 point
    /// * `Err(InterpolationError::NonIncreasing)` if xs are not strictly
    ///   increasing
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::MismatchedLengths {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.is_empty() {
            return Err(InterpolationError::InsufficientData { got: 0, need: 1 });
        }
        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(InterpolationError::NonIncreasing { index: i });
            }
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Returns the valid x-domain `(min, max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Returns the number of data points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if the interpolator has no data points.
    /// Never true for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Evaluate at `x`, clamping outside the domain.
    ///
    /// Inside the domain: `y = y0 + (y1 - y0) * (x - x0) / (x1 - x0)` over
    /// the bracketing segment, found by binary search.
    pub fn eval(&self, x: T) -> T {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }

        // partition_point returns the index where the predicate turns false
        let pos = self.xs.partition_point(|&xi| xi <= x);
        let i = pos - 1; // xs[i] <= x < xs[i+1], with i in [0, n-2]

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// Index of the bracketing segment for `x`, clamped to `[0, n-1]`.
    ///
    /// Split-table audit records cite which bracket produced a share, so the
    /// selection must be reproducible alongside the value itself.
    pub fn bracket_index(&self, x: T) -> usize {
        let n = self.xs.len();
        if x < self.xs[0] {
            return 0;
        }
        let pos = self.xs.partition_point(|&xi| xi <= x);
        pos.saturating_sub(1).min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_midpoint() {
        let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
        assert_relative_eq!(interp.eval(0.5), 1.0);
        assert_relative_eq!(interp.eval(1.5), 3.0);
    }

    #[test]
    fn test_knot_points() {
        let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[1.0, 3.0, 9.0]).unwrap();
        assert_relative_eq!(interp.eval(0.0), 1.0);
        assert_relative_eq!(interp.eval(1.0), 3.0);
        assert_relative_eq!(interp.eval(2.0), 9.0);
    }

    #[test]
    fn test_clamping() {
        let interp = LinearInterpolator::new(&[1.0, 2.0], &[0.6, 0.4]).unwrap();
        assert_relative_eq!(interp.eval(-5.0), 0.6);
        assert_relative_eq!(interp.eval(100.0), 0.4);
    }

    #[test]
    fn test_single_point_is_constant() {
        let interp = LinearInterpolator::new(&[1.0], &[0.5]).unwrap();
        assert_relative_eq!(interp.eval(0.0), 0.5);
        assert_relative_eq!(interp.eval(1.0), 0.5);
        assert_relative_eq!(interp.eval(2.0), 0.5);
    }

    #[test]
    fn test_non_increasing_rejected() {
        let result = LinearInterpolator::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::NonIncreasing { index: 2 })
        ));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = LinearInterpolator::new(&[0.0, 1.0], &[0.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::MismatchedLengths { xs: 2, ys: 1 })
        ));
    }

    #[test]
    fn test_bracket_index() {
        let interp = LinearInterpolator::new(&[1.0, 1.5, 2.5], &[0.7, 0.6, 0.4]).unwrap();
        assert_eq!(interp.bracket_index(0.5), 0);
        assert_eq!(interp.bracket_index(1.2), 0);
        assert_eq!(interp.bracket_index(1.5), 1);
        assert_eq!(interp.bracket_index(2.0), 1);
        assert_eq!(interp.bracket_index(3.0), 2);
    }
}
