//! Condensed (upper-triangular) index mapping.
//!
//! For `n` points the pairs `(i, j)`, `0 <= i < j < n`, are stored row by row:
//!
//! ```text
//! [d(0,1), d(0,2), ..., d(0,n-1), d(1,2), ..., d(n-2,n-1)]
//! ```
//!
//! `condensed_index` is a bijection from that triangle onto
//! `0..condensed_len(n)`. Each unit evaluates it on its own; no unit needs to
//! know what any other unit has written.

use crate::dtype::Element;

/// Length of the condensed vector for `n` points: `n * (n - 1) / 2`.
#[inline]
pub const fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Offset of pair `(i, j)` in the condensed vector.
///
/// `i * (2n - i - 1) / 2` pairs belong to earlier rows; `j - i - 1` is the
/// position of `j` among row `i`'s partners. The product `i * (2n - i - 1)`
/// is always even, so the division is exact.
///
/// Requires `i < j < n`; checked in debug builds.
#[inline]
pub const fn condensed_index(i: usize, j: usize, n: usize) -> usize {
    debug_assert!(i < j && j < n);
    i * (2 * n - i - 1) / 2 + (j - i - 1)
}

/// First condensed offset of row `i`, i.e. the offset of `(i, i + 1)`.
#[inline]
pub const fn row_start(i: usize, n: usize) -> usize {
    i * (2 * n - i - 1) / 2
}

/// Inverse of [`condensed_index`]: the pair stored at offset `k`.
///
/// Requires `k < condensed_len(n)`.
pub fn condensed_to_pair(k: usize, n: usize) -> (usize, usize) {
    debug_assert!(k < condensed_len(n));
    // Closed-form estimate, then step to the exact row; f64 rounding can put
    // the estimate one row off for large n.
    let nf = n as f64;
    let kf = k as f64;
    let disc = (-8.0 * kf + 4.0 * nf * (nf - 1.0) - 7.0).max(0.0);
    let est = nf - 2.0 - (disc.sqrt() / 2.0 - 0.5).floor();
    let mut i = (est.max(0.0) as usize).min(n.saturating_sub(2));
    while i > 0 && row_start(i, n) > k {
        i -= 1;
    }
    while i + 2 < n && row_start(i + 1, n) <= k {
        i += 1;
    }
    let j = k - row_start(i, n) + i + 1;
    (i, j)
}

/// Expand a condensed vector into a full `n` × `n` symmetric matrix with a
/// zero diagonal.
///
/// `condensed.len()` must be `condensed_len(n)` and `square.len()` must be `n * n`.
pub fn squareform_kernel<T: Element>(condensed: &[T], square: &mut [T], n: usize) {
    for i in 0..n {
        square[i * n + i] = T::zero();
    }

    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let val = condensed[k];
            square[i * n + j] = val;
            square[j * n + i] = val;
            k += 1;
        }
    }
}

/// Extract the strict upper triangle of an `n` × `n` matrix in condensed order.
pub fn squareform_inverse_kernel<T: Element>(square: &[T], condensed: &mut [T], n: usize) {
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            condensed[k] = square[i * n + j];
            k += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condensed_len() {
        assert_eq!(condensed_len(0), 0);
        assert_eq!(condensed_len(1), 0);
        assert_eq!(condensed_len(2), 1);
        assert_eq!(condensed_len(5), 10);
    }

    #[test]
    fn test_condensed_index_small() {
        // n=3: (0,1)->0 (0,2)->1 (1,2)->2
        assert_eq!(condensed_index(0, 1, 3), 0);
        assert_eq!(condensed_index(0, 2, 3), 1);
        assert_eq!(condensed_index(1, 2, 3), 2);
    }

    #[test]
    fn test_condensed_index_is_bijection() {
        for n in 2..40 {
            let mut seen = vec![false; condensed_len(n)];
            for i in 0..n {
                for j in (i + 1)..n {
                    let k = condensed_index(i, j, n);
                    assert!(!seen[k], "collision at n={} ({}, {})", n, i, j);
                    seen[k] = true;
                }
            }
            assert!(seen.iter().all(|&s| s), "gap for n={}", n);
        }
    }

    #[test]
    fn test_condensed_index_matches_row_major_walk() {
        let n = 17;
        let mut k = 0;
        for i in 0..n {
            assert_eq!(row_start(i, n), k);
            for j in (i + 1)..n {
                assert_eq!(condensed_index(i, j, n), k);
                k += 1;
            }
        }
    }

    #[test]
    fn test_condensed_to_pair_inverts() {
        for n in [2usize, 3, 4, 7, 33, 100] {
            for k in 0..condensed_len(n) {
                let (i, j) = condensed_to_pair(k, n);
                assert!(i < j && j < n);
                assert_eq!(condensed_index(i, j, n), k);
            }
        }
    }

    #[test]
    fn test_condensed_to_pair_large_n() {
        let n = 200_000;
        let last = condensed_len(n) - 1;
        assert_eq!(condensed_to_pair(last, n), (n - 2, n - 1));
        assert_eq!(condensed_to_pair(0, n), (0, 1));
        let k = condensed_index(12_345, 150_000, n);
        assert_eq!(condensed_to_pair(k, n), (12_345, 150_000));
    }

    #[test]
    fn test_squareform() {
        let condensed = [1.0f32, 2.0, 3.0]; // d(0,1), d(0,2), d(1,2)
        let mut square = [9.0f32; 9];
        squareform_kernel(&condensed, &mut square, 3);

        // [[0, 1, 2],
        //  [1, 0, 3],
        //  [2, 3, 0]]
        assert_eq!(square, [0.0, 1.0, 2.0, 1.0, 0.0, 3.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_squareform_inverse() {
        let square = [0.0f32, 1.0, 2.0, 1.0, 0.0, 3.0, 2.0, 3.0, 0.0];
        let mut condensed = [0.0f32; 3];
        squareform_inverse_kernel(&square, &mut condensed, 3);
        assert_eq!(condensed, [1.0, 2.0, 3.0]);
    }
}
