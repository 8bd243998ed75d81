//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform matrix in [-10, 10), `n * m` elements, reproducible per seed
pub fn random_matrix(n: usize, m: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * m).map(|_| rng.random_range(-10.0f32..10.0)).collect()
}

/// Straight double-loop pdist in f64, including p = inf.
///
/// Always applies the 1/p root.
pub fn reference_pdist(x: &[f32], n: usize, m: usize, p: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let diffs = (0..m).map(|k| (x[i * m + k] as f64 - x[j * m + k] as f64).abs());
            let d = if p.is_infinite() {
                diffs.fold(0.0, f64::max)
            } else {
                diffs.map(|d| d.powf(p)).sum::<f64>().powf(1.0 / p)
            };
            out.push(d);
        }
    }
    out
}

/// Assert two slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose(a: &[f32], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x as f64 - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
