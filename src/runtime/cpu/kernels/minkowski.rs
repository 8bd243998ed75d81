//! Per-pair Minkowski distance kernel.
//!
//! Works in three passes over a scratch row, mirroring a vector unit:
//! `|a - b|` into scratch, an elementwise transform for the regime, then a
//! lane-wise reduction. All arithmetic is in `T::Accum`.
//!
//! | Regime      | Transform                 | Reduce | Finish           |
//! |-------------|---------------------------|--------|------------------|
//! | `Manhattan` | none                      | sum    | none             |
//! | `Euclidean` | `d * d`                   | sum    | `sqrt`           |
//! | `Power(p)`  | `exp(p * ln(d + eps))`    | sum    | `^(1/p)` if `Apply` |
//! | `Chebyshev` | none                      | max    | none             |
//!
//! Only the first `m` elements of each row take part, so padding never
//! contributes, not even the `eps^p` the log path would give a zero element.

use crate::dtype::Element;
use crate::ops::{Exponent, RootMode};
use num_traits::Float;

/// Shift applied before `ln` in the general-p path so `ln(0)` is never taken.
pub const LOG_EPSILON: f64 = 1e-20;

/// Accumulator lanes. Wide enough for one AVX2 register of f32.
pub const LANES: usize = 8;

/// Distance between rows `a` and `b` under `exponent`.
///
/// `a` and `b` must have the same length `m` and `scratch` at least `m`
/// elements. NaN and infinities propagate; nothing here is an error.
#[inline]
pub fn pairwise_distance<T: Element>(
    a: &[T],
    b: &[T],
    exponent: Exponent,
    root: RootMode,
    scratch: &mut [T::Accum],
) -> T {
    debug_assert_eq!(a.len(), b.len());
    let diff = &mut scratch[..a.len()];
    abs_diff(a, b, diff);

    let result = match exponent {
        Exponent::Manhattan => lane_sum(diff),
        Exponent::Euclidean => {
            diff.iter_mut().for_each(|d| *d = *d * *d);
            lane_sum(diff).sqrt()
        }
        Exponent::Chebyshev => lane_max(diff),
        Exponent::Power(p) => {
            let p = cast::<T::Accum>(p as f64);
            let eps = cast::<T::Accum>(LOG_EPSILON);
            diff.iter_mut().for_each(|d| *d = (p * (*d + eps).ln()).exp());
            let sum = lane_sum(diff);
            match root {
                RootMode::Apply => sum.powf(p.recip()),
                RootMode::PowerSumOnly => sum,
            }
        }
    };
    T::narrow(result)
}

#[inline]
fn abs_diff<T: Element>(a: &[T], b: &[T], out: &mut [T::Accum]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = (x.widen() - y.widen()).abs();
    }
}

#[inline]
fn cast<A: Float>(v: f64) -> A {
    A::from(v).unwrap_or_else(A::nan)
}

/// Sum with `LANES` independent accumulators folded in a fixed order.
///
/// The order depends only on the row length, so the same pair always
/// produces the same bits no matter which unit computes it.
#[inline]
pub fn lane_sum<A: Float>(v: &[A]) -> A {
    let mut acc = [A::zero(); LANES];
    let chunks = v.chunks_exact(LANES);
    let rem = chunks.remainder();
    for chunk in chunks {
        for (a, &x) in acc.iter_mut().zip(chunk) {
            *a = *a + x;
        }
    }
    for (a, &x) in acc.iter_mut().zip(rem) {
        *a = *a + x;
    }
    ((acc[0] + acc[4]) + (acc[1] + acc[5])) + ((acc[2] + acc[6]) + (acc[3] + acc[7]))
}

/// Maximum that keeps NaN once seen.
#[inline]
pub fn lane_max<A: Float>(v: &[A]) -> A {
    let pick = |m: A, x: A| if x > m || x.is_nan() { x } else { m };
    let mut acc = [A::zero(); LANES];
    let chunks = v.chunks_exact(LANES);
    let rem = chunks.remainder();
    for chunk in chunks {
        for (a, &x) in acc.iter_mut().zip(chunk) {
            *a = pick(*a, x);
        }
    }
    for (a, &x) in acc.iter_mut().zip(rem) {
        *a = pick(*a, x);
    }
    acc.iter().fold(A::zero(), |m, &x| if m.is_nan() { m } else { pick(m, x) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: &[f32], b: &[f32], p: f32, root: RootMode) -> f32 {
        let mut scratch = vec![0.0f32; a.len()];
        pairwise_distance(a, b, Exponent::from_p(p), root, &mut scratch)
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(dist(&[0.0, 0.0], &[3.0, 4.0], 1.0, RootMode::Apply), 7.0);
        assert_eq!(dist(&[0.0, 0.0, 0.0], &[1.0, -2.0, 3.0], 1.0, RootMode::Apply), 6.0);
    }

    #[test]
    fn test_euclidean() {
        assert_eq!(dist(&[0.0, 0.0], &[3.0, 4.0], 2.0, RootMode::Apply), 5.0);
        let d = dist(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0], 2.0, RootMode::Apply);
        assert!((d - 3.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_chebyshev() {
        let d = dist(&[0.0, 0.0, 0.0], &[1.0, -5.0, 3.0], f32::INFINITY, RootMode::Apply);
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_general_p_applies_root() {
        // (3^3 + 4^3)^(1/3) = 91^(1/3)
        let d = dist(&[0.0, 0.0], &[3.0, 4.0], 3.0, RootMode::Apply);
        assert!((d - 91.0f32.powf(1.0 / 3.0)).abs() < 1e-4, "got {}", d);
    }

    #[test]
    fn test_general_p_power_sum_only() {
        let d = dist(&[0.0, 0.0], &[3.0, 4.0], 3.0, RootMode::PowerSumOnly);
        assert!((d - 91.0).abs() < 1e-3, "got {}", d);
    }

    #[test]
    fn test_general_p_fractional() {
        // (1^0.5 + 4^0.5)^2 = 9
        let d = dist(&[0.0, 0.0], &[1.0, 4.0], 0.5, RootMode::Apply);
        assert!((d - 9.0).abs() < 1e-4, "got {}", d);
    }

    #[test]
    fn test_general_p_zero_difference_is_finite() {
        let d = dist(&[1.0, 2.0], &[1.0, 2.0], 3.0, RootMode::PowerSumOnly);
        assert!(d.is_finite());
        assert!(d >= 0.0 && d < 1e-30);
    }

    #[test]
    fn test_scratch_longer_than_row() {
        let mut scratch = vec![123.0f64; 16];
        let d = pairwise_distance(
            &[0.0f64, 0.0],
            &[3.0, 4.0],
            Exponent::Euclidean,
            RootMode::Apply,
            &mut scratch,
        );
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_lane_sum_long_row() {
        let v: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        assert_eq!(lane_sum(&v), 5050.0);
        assert_eq!(lane_sum::<f64>(&[]), 0.0);
    }

    #[test]
    fn test_lane_max_propagates_nan() {
        let v = [1.0f32, f32::NAN, 3.0, 0.5, 0.0, 2.0, 9.0, 1.0, 4.0];
        assert!(lane_max(&v).is_nan());
        assert_eq!(lane_max(&[1.0f32, 9.0, 3.0, 0.5, 4.0, 2.0, 0.0, 1.0, 7.0]), 9.0);
    }

    #[test]
    fn test_nan_propagates() {
        let d = dist(&[f32::NAN, 0.0], &[1.0, 1.0], 2.0, RootMode::Apply);
        assert!(d.is_nan());
    }
}
