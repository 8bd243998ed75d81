//! Cyclic row ownership.
//!
//! Unit `u` of `U` owns rows `u, u + U, u + 2U, ...` below `n` and computes
//! every pair `(i, j)` with `i` owned and `j > i`. Only the outer loop is
//! split, so each output offset has exactly one owner.
//!
//! Row `i` has `n - 1 - i` partners. A contiguous block split would hand the
//! first unit almost all of the triangle; dealing rows round-robin keeps the
//! per-unit pair counts within `n` of each other.

use crate::error::{Error, Result};
use crate::runtime::cpu::kernels::condensed_index;
use std::iter::StepBy;
use std::ops::Range;

/// Row-cyclic assignment of `n` rows to `units` execution units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CyclicPartition {
    n: usize,
    units: usize,
}

impl CyclicPartition {
    /// Partition `n` rows over `units` units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `units == 0`.
    pub fn new(n: usize, units: usize) -> Result<Self> {
        if units == 0 {
            return Err(Error::invalid_argument(
                "units",
                "partition needs at least one unit",
            ));
        }
        Ok(Self { n, units })
    }

    /// Number of rows
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of units
    #[inline]
    pub fn units(&self) -> usize {
        self.units
    }

    /// The unit that owns row `i`
    #[inline]
    pub fn owner(&self, i: usize) -> usize {
        i % self.units
    }

    /// Rows owned by `unit`. Empty for `unit >= units`.
    #[inline]
    pub fn rows(&self, unit: usize) -> StepBy<Range<usize>> {
        let start = if unit < self.units { unit } else { self.n };
        (start..self.n).step_by(self.units)
    }

    /// Condensed output offsets written by `unit`, in write order.
    pub fn offsets(&self, unit: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.n;
        self.rows(unit)
            .flat_map(move |i| ((i + 1)..n).map(move |j| condensed_index(i, j, n)))
    }

    /// Number of pairs `unit` computes.
    pub fn work(&self, unit: usize) -> usize {
        self.rows(unit).map(|i| self.n - 1 - i).sum()
    }
}
