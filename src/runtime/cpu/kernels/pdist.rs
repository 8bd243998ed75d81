//! Distance compute engine.
//!
//! Each active unit walks its cyclically owned rows `i`, streams row `i`
//! through a double buffer and every partner `j > i` through a single inner
//! buffer, and writes `d(i, j)` at its condensed offset.
//!
//! The output slice is carved into one segment per row before any unit
//! starts; segment `i` covers `row_start(i)..row_start(i + 1)`. Segments are
//! then handed to the unit that owns row `i`. Ownership is checked by the
//! borrow checker: units hold disjoint `&mut` segments and nothing else is
//! shared except the read-only input and tiling.

use super::condensed::{condensed_index, row_start};
use super::minkowski::pairwise_distance;
use super::row_buffer::{DoubleBuffer, RowBuffer};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::MatrixRef;
use crate::ops::distance_common::validate_exponent;
use crate::ops::{Exponent, RootMode};
use crate::tiling::PdistTiling;

/// Per-unit local buffers: outer double buffer, inner row, reduction scratch.
#[derive(Debug, Clone)]
pub struct UnitBuffers<T: Element> {
    outer: DoubleBuffer<T>,
    inner: RowBuffer<T>,
    reduce: Vec<T::Accum>,
}

impl<T: Element> UnitBuffers<T> {
    fn new(aligned_len: usize) -> Self {
        Self {
            outer: DoubleBuffer::new(aligned_len),
            inner: RowBuffer::new(aligned_len),
            reduce: vec![<T::Accum as num_traits::Zero>::zero(); aligned_len],
        }
    }
}

/// Local buffers for every active unit of one tiling.
///
/// Reusable across invocations with the same tiling; [`pdist_kernel`]
/// reallocates it when handed a workspace sized for a different one.
#[derive(Debug, Clone)]
pub struct Workspace<T: Element> {
    aligned_len: usize,
    units: Vec<UnitBuffers<T>>,
}

impl<T: Element> Workspace<T> {
    /// Allocate buffers for `tiling`
    pub fn new(tiling: &PdistTiling) -> Self {
        let aligned_len = tiling.aligned_row_len();
        Self {
            aligned_len,
            units: (0..tiling.active_units())
                .map(|_| UnitBuffers::new(aligned_len))
                .collect(),
        }
    }

    /// Bytes a workspace for `tiling` occupies
    pub fn size_in_bytes(tiling: &PdistTiling) -> usize {
        let per_row = tiling.aligned_row_len() * std::mem::size_of::<T>();
        let scratch = tiling.aligned_row_len() * std::mem::size_of::<T::Accum>();
        // outer x2 + inner + scratch
        tiling.active_units() * (3 * per_row + scratch)
    }

    fn fits(&self, tiling: &PdistTiling) -> bool {
        self.aligned_len == tiling.aligned_row_len() && self.units.len() == tiling.active_units()
    }
}

/// Compute the condensed distance vector for `x` into `out`.
///
/// The exponent is taken from `tiling`; `root` only affects the general-p
/// path. `out` is fully overwritten. Running twice with the same arguments
/// yields identical bits.
///
/// # Errors
///
/// Returns `InvalidShape` if `x` is not `[tiling.n(), tiling.m()]` or
/// `out.len() != tiling.output_len()`, and `InvalidArgument` if the block's
/// exponent is NaN or not positive or it has no active units. Nothing is
/// written in either case.
pub fn pdist_kernel<T: Element>(
    x: MatrixRef<'_, T>,
    out: &mut [T],
    tiling: &PdistTiling,
    root: RootMode,
    workspace: &mut Workspace<T>,
) -> Result<()> {
    let n = tiling.n();
    if x.shape() != [n, tiling.m()] {
        return Err(Error::invalid_shape(format!(
            "input shape {:?} does not match tiling [{}, {}]",
            x.shape(),
            n,
            tiling.m()
        )));
    }
    if out.len() != tiling.output_len() {
        return Err(Error::invalid_shape(format!(
            "pdist with n={} expects condensed length {}, got {}",
            n,
            tiling.output_len(),
            out.len()
        )));
    }
    validate_exponent(tiling.p(), "pdist")?;
    let partition = tiling.partition()?;
    if n < 2 {
        return Ok(());
    }
    if !workspace.fits(tiling) {
        *workspace = Workspace::new(tiling);
    }

    let exponent = Exponent::from_p(tiling.p());
    let units = tiling.active_units();

    let mut owned: Vec<Vec<(usize, &mut [T])>> = (0..units).map(|_| Vec::new()).collect();
    for (i, seg) in row_segments(out, n).into_iter().enumerate() {
        owned[partition.owner(i)].push((i, seg));
    }

    log::debug!(
        "pdist dispatch: {} {} pairs over {} unit(s), exponent={}",
        T::DTYPE,
        tiling.output_len(),
        units,
        exponent.name()
    );

    if units == 1 {
        for (unit, (rows, bufs)) in owned.into_iter().zip(workspace.units.iter_mut()).enumerate() {
            run_unit(unit, x, rows, exponent, root, bufs);
        }
        return Ok(());
    }

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        owned
            .into_par_iter()
            .zip(workspace.units.par_iter_mut())
            .enumerate()
            .for_each(|(unit, (rows, bufs))| {
                run_unit(unit, x, rows, exponent, root, bufs);
            });
    }

    #[cfg(not(feature = "rayon"))]
    for (unit, (rows, bufs)) in owned.into_iter().zip(workspace.units.iter_mut()).enumerate() {
        run_unit(unit, x, rows, exponent, root, bufs);
    }

    Ok(())
}

/// Split `out` into per-row segments using the index mapping.
fn row_segments<T>(out: &mut [T], n: usize) -> Vec<&mut [T]> {
    let mut segments = Vec::with_capacity(n);
    let mut rest = out;
    for i in 0..n {
        let len = row_start(i + 1, n) - row_start(i, n);
        let (seg, tail) = std::mem::take(&mut rest).split_at_mut(len);
        segments.push(seg);
        rest = tail;
    }
    debug_assert!(rest.is_empty());
    segments
}

/// One unit's loop over its owned rows. Returns the number of pairs written.
fn run_unit<T: Element>(
    unit: usize,
    x: MatrixRef<'_, T>,
    rows: Vec<(usize, &mut [T])>,
    exponent: Exponent,
    root: RootMode,
    bufs: &mut UnitBuffers<T>,
) -> usize {
    let n = x.rows();
    let UnitBuffers {
        outer,
        inner,
        reduce,
    } = bufs;

    let owned_rows = rows.len();
    let mut rows = rows.into_iter().peekable();
    match rows.peek().map(|(i, _)| *i) {
        Some(first) => outer.load_front(first, x.row(first)),
        None => {
            log::trace!("pdist unit {} owns no rows", unit);
            return 0;
        }
    }

    let mut pairs = 0;
    while let Some((i, seg)) = rows.next() {
        if let Some(next) = rows.peek().map(|(j, _)| *j) {
            outer.prefetch(next, x.row(next));
        }

        let base = row_start(i, n);
        let row_i = outer.front();
        debug_assert_eq!(row_i.row_index(), Some(i));
        for j in (i + 1)..n {
            inner.load(j, x.row(j));
            seg[condensed_index(i, j, n) - base] =
                pairwise_distance(row_i.row(), inner.row(), exponent, root, reduce);
        }
        inner.release();
        pairs += n - 1 - i;

        outer.advance();
    }
    log::trace!(
        "pdist unit {} computed {} pairs over {} rows",
        unit,
        pairs,
        owned_rows
    );
    pairs
}
