//! Distance computation operations.
//!
//! This module defines the `DistanceOps` trait and the exponent regimes the
//! Minkowski kernel specializes on.

use crate::dtype::Element;
use crate::error::Result;
use crate::matrix::MatrixRef;

/// Computational regime for a Minkowski exponent `p`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Exponent {
    /// p = 1: sum(|x - y|)
    Manhattan,
    /// p = 2: sqrt(sum((x - y)^2)), the default
    #[default]
    Euclidean,
    /// p = +inf: max(|x - y|)
    Chebyshev,
    /// Any other p: sum(exp(p * ln(|x - y| + eps))), rooted per [`RootMode`]
    Power(f32),
}

impl Exponent {
    /// Classify `p` into its regime
    pub fn from_p(p: f32) -> Self {
        if p == 1.0 {
            Exponent::Manhattan
        } else if p == 2.0 {
            Exponent::Euclidean
        } else if p == f32::INFINITY {
            Exponent::Chebyshev
        } else {
            Exponent::Power(p)
        }
    }

    /// The exponent value
    pub fn p(&self) -> f32 {
        match self {
            Exponent::Manhattan => 1.0,
            Exponent::Euclidean => 2.0,
            Exponent::Chebyshev => f32::INFINITY,
            Exponent::Power(p) => *p,
        }
    }

    /// Returns the name of the regime for log and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Exponent::Manhattan => "manhattan",
            Exponent::Euclidean => "euclidean",
            Exponent::Chebyshev => "chebyshev",
            Exponent::Power(_) => "minkowski",
        }
    }
}

/// Whether the general-p path takes the final `1/p` root.
///
/// `Apply` yields the Minkowski distance `(sum |d|^p)^(1/p)`. `PowerSumOnly`
/// stops at `sum |d|^p`, matching kernels that leave the root to the caller.
/// p = 1, p = 2 and p = inf are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMode {
    /// Take the `1/p` root (Minkowski distance)
    #[default]
    Apply,
    /// Return the raw power sum
    PowerSumOnly,
}

/// Distance computation operations.
///
/// # Data Types
///
/// F32 and F64 always; F16 with the `f16` feature. Reduced-precision inputs
/// are accumulated in f32.
pub trait DistanceOps {
    /// Compute pairwise distances within a single point set (condensed form).
    ///
    /// # Arguments
    ///
    /// * `x` - Point set with shape (n, m)
    /// * `p` - Minkowski exponent, `> 0`; `f32::INFINITY` for Chebyshev
    ///
    /// # Returns
    ///
    /// Condensed distance vector of length n*(n-1)/2:
    /// [d(0,1), d(0,2), ..., d(0,n-1), d(1,2), ..., d(n-2,n-1)].
    /// A single point yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `p` is NaN or not positive, and
    /// `Error::PlatformUnavailable` if the backend cannot describe itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdistr::prelude::*;
    ///
    /// let data = [0.0f32, 0.0, 3.0, 4.0, 0.0, 0.0];
    /// let x = MatrixRef::new(&data, 3, 2)?;
    /// let d = CpuClient::new().pdist(x, 2.0)?;
    /// assert_eq!(d, vec![5.0, 0.0, 5.0]);
    /// # Ok::<(), pdistr::error::Error>(())
    /// ```
    fn pdist<T: Element>(&self, x: MatrixRef<'_, T>, p: f32) -> Result<Vec<T>>;

    /// Compute pairwise distances into a caller-provided condensed vector.
    ///
    /// # Errors
    ///
    /// As [`DistanceOps::pdist`], plus `Error::InvalidShape` if
    /// `out.len() != n*(n-1)/2`. On error `out` is untouched.
    fn pdist_into<T: Element>(&self, x: MatrixRef<'_, T>, p: f32, out: &mut [T]) -> Result<()>;

    /// Convert a condensed distance vector to a square distance matrix.
    ///
    /// Returns `n * n` elements, row-major, symmetric, zero diagonal.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidShape` if `condensed.len() != n*(n-1)/2`.
    fn squareform<T: Element>(&self, condensed: &[T], n: usize) -> Result<Vec<T>>;

    /// Convert a square distance matrix to condensed form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidShape` if `square` is not `n × n`.
    fn squareform_inverse<T: Element>(&self, square: MatrixRef<'_, T>) -> Result<Vec<T>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_p() {
        assert_eq!(Exponent::from_p(1.0), Exponent::Manhattan);
        assert_eq!(Exponent::from_p(2.0), Exponent::Euclidean);
        assert_eq!(Exponent::from_p(f32::INFINITY), Exponent::Chebyshev);
        assert_eq!(Exponent::from_p(3.0), Exponent::Power(3.0));
        assert_eq!(Exponent::from_p(0.5).p(), 0.5);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Exponent::default().p(), 2.0);
        assert_eq!(RootMode::default(), RootMode::Apply);
    }
}
