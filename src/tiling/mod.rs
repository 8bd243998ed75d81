//! Partition planning for condensed pairwise distances.
//!
//! The planner turns an input shape, an exponent and the platform's
//! capabilities into a [`PdistTiling`]: a small immutable parameter block
//! that every execution unit reads and nobody writes.
//!
//! Two numbers are decided here:
//!
//! - `aligned_row_len`: the row length in elements after padding the row's
//!   byte size up to the platform's transfer granularity. Row buffers are
//!   allocated at this length so every row copy is a whole number of
//!   transfer units.
//! - `active_units`: all available units, unless there are fewer rows than
//!   units, in which case a single unit does everything. This is a threshold
//!   and not a cost model; a wrong guess only costs time.

pub mod partition;

pub use partition::CyclicPartition;

use crate::error::{Error, Result};
use crate::ops::distance_common::validate_exponent;
use crate::runtime::{Platform, PlatformInfo};
use bytemuck::{Pod, Zeroable};

/// Dispatch tag written into every record. Reserved; always this value.
pub const TILING_VARIANT: u32 = 1;

/// Immutable parameter block shared read-only by every execution unit.
///
/// The layout is fixed (`#[repr(C)]`, six 4-byte fields, 24 bytes) so the
/// block can be stored or shipped as raw bytes, see [`PdistTiling::to_bytes`].
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PdistTiling {
    n: u32,
    m: u32,
    p: f32,
    aligned_row_len: u32,
    active_units: u32,
    variant: u32,
}

impl PdistTiling {
    /// Size of the serialized record in bytes
    pub const RECORD_SIZE: usize = std::mem::size_of::<PdistTiling>();

    /// Number of rows (N)
    #[inline]
    pub fn n(&self) -> usize {
        self.n as usize
    }

    /// Row dimension (M)
    #[inline]
    pub fn m(&self) -> usize {
        self.m as usize
    }

    /// Distance exponent
    #[inline]
    pub fn p(&self) -> f32 {
        self.p
    }

    /// Row buffer length in elements, `>= m`
    #[inline]
    pub fn aligned_row_len(&self) -> usize {
        self.aligned_row_len as usize
    }

    /// Number of execution units that do work
    #[inline]
    pub fn active_units(&self) -> usize {
        self.active_units as usize
    }

    /// Reserved dispatch tag
    #[inline]
    pub fn variant(&self) -> u32 {
        self.variant
    }

    /// Length of the condensed output, `n * (n - 1) / 2`
    #[inline]
    pub fn output_len(&self) -> usize {
        crate::runtime::cpu::kernels::condensed_len(self.n())
    }

    /// Cyclic row partition described by this block
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the block has no active units, which
    /// only a hand-built block can have.
    #[inline]
    pub fn partition(&self) -> Result<CyclicPartition> {
        CyclicPartition::new(self.n(), self.active_units())
    }

    /// Serialize into the fixed 24-byte record (native endianness)
    pub fn to_bytes(&self) -> [u8; Self::RECORD_SIZE] {
        bytemuck::cast(*self)
    }

    /// Decode a record produced by [`PdistTiling::to_bytes`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecord` if `bytes` is not exactly [`Self::RECORD_SIZE`]
    /// long or the decoded fields are inconsistent: a zero dimension, an
    /// aligned length shorter than `m`, no active units, a NaN or
    /// non-positive `p`, or a variant other than [`TILING_VARIANT`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let tiling: PdistTiling =
            bytemuck::try_pod_read_unaligned(bytes).map_err(|_| Error::InvalidRecord {
                reason: format!("expected {} bytes, got {}", Self::RECORD_SIZE, bytes.len()),
            })?;
        if tiling.n == 0 || tiling.m == 0 {
            return Err(Error::InvalidRecord {
                reason: format!("zero dimension in [{}, {}]", tiling.n, tiling.m),
            });
        }
        if tiling.aligned_row_len < tiling.m {
            return Err(Error::InvalidRecord {
                reason: format!(
                    "aligned row length {} shorter than row dimension {}",
                    tiling.aligned_row_len, tiling.m
                ),
            });
        }
        if tiling.active_units == 0 {
            return Err(Error::InvalidRecord {
                reason: "no active units".to_string(),
            });
        }
        if tiling.p.is_nan() || tiling.p <= 0.0 {
            return Err(Error::InvalidRecord {
                reason: format!("exponent must be > 0, got {}", tiling.p),
            });
        }
        if tiling.variant != TILING_VARIANT {
            return Err(Error::InvalidRecord {
                reason: format!(
                    "unknown variant {} (expected {})",
                    tiling.variant, TILING_VARIANT
                ),
            });
        }
        Ok(tiling)
    }
}

/// Round a row of `m` elements up to whole transfer units.
///
/// `ceil(m * element_size / granularity) * granularity / element_size`
#[inline]
pub fn aligned_row_len(m: usize, element_size: usize, transfer_granularity: usize) -> usize {
    let row_bytes = m * element_size;
    row_bytes.div_ceil(transfer_granularity) * transfer_granularity / element_size
}

/// Units to activate for `n` rows on a platform with `available` units.
#[inline]
pub fn active_units(n: usize, available: usize) -> usize {
    if n < available { 1 } else { available }
}

/// Plan a pdist invocation.
///
/// # Arguments
///
/// * `shape` - Input shape `[n, m]`
/// * `p` - Distance exponent, `> 0` (`f32::INFINITY` for Chebyshev), stored verbatim
/// * `element_size` - Bytes per element
/// * `platform` - Available unit count and transfer granularity
///
/// # Errors
///
/// - `InvalidShape` if `n < 1`, `m < 1`, or either does not fit in `u32`
/// - `InvalidArgument` if `p` is NaN or not positive
/// - `InvalidArgument` if the platform reports zero units, a zero transfer
///   granularity, or a granularity that is not a whole number of elements
pub fn plan(
    shape: [usize; 2],
    p: f32,
    element_size: usize,
    platform: &PlatformInfo,
) -> Result<PdistTiling> {
    let [n, m] = shape;
    validate_exponent(p, "pdist")?;
    if n < 1 || m < 1 {
        return Err(Error::invalid_shape(format!(
            "pdist expects n >= 1 and m >= 1, got [{}, {}]",
            n, m
        )));
    }
    if element_size == 0 {
        return Err(Error::invalid_argument(
            "element_size",
            "element size must be non-zero",
        ));
    }
    if platform.units == 0 {
        return Err(Error::invalid_argument(
            "units",
            "platform reports zero execution units",
        ));
    }
    if platform.transfer_granularity == 0
        || !platform.transfer_granularity.is_multiple_of(element_size)
    {
        return Err(Error::invalid_argument(
            "transfer_granularity",
            format!(
                "{} bytes is not a non-zero multiple of the {}-byte element",
                platform.transfer_granularity, element_size
            ),
        ));
    }

    let aligned = aligned_row_len(m, element_size, platform.transfer_granularity);
    let units = active_units(n, platform.units);

    let to_u32 = |v: usize, what: &str| {
        u32::try_from(v)
            .map_err(|_| Error::invalid_shape(format!("{} = {} does not fit in u32", what, v)))
    };
    let tiling = PdistTiling {
        n: to_u32(n, "n")?,
        m: to_u32(m, "m")?,
        p,
        aligned_row_len: to_u32(aligned, "aligned row length")?,
        active_units: to_u32(units, "active units")?,
        variant: TILING_VARIANT,
    };

    log::debug!(
        "pdist tiling: n={} m={} p={} aligned_row_len={} active_units={} (available {})",
        n,
        m,
        p,
        aligned,
        units,
        platform.units
    );
    Ok(tiling)
}

/// Plan against a platform capability query.
///
/// # Errors
///
/// Returns `PlatformUnavailable` if the query yields nothing, otherwise the
/// errors of [`plan`].
pub fn plan_on<P: Platform + ?Sized>(
    shape: [usize; 2],
    p: f32,
    element_size: usize,
    platform: &P,
) -> Result<PdistTiling> {
    let info = platform.query().ok_or(Error::PlatformUnavailable)?;
    plan(shape, p, element_size, &info)
}
