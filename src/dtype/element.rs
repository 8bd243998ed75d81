//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use num_traits::Float;
use std::fmt::Debug;

/// Trait for types that can be elements of an input matrix or output vector
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - rows are shared read-only across units
/// - `Pod + Zeroable` - row buffers are zero-filled and records are byte-cast
///
/// Distance arithmetic never happens in `Self` directly. Each element is
/// widened to [`Element::Accum`], reduced there, and narrowed once per pair.
pub trait Element: Copy + Send + Sync + Pod + Zeroable + PartialOrd + Debug + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Type that differences, powers and sums are computed in
    type Accum: Float + Send + Sync + Debug + 'static;

    /// Convert to the accumulator type
    fn widen(self) -> Self::Accum;

    /// Convert an accumulated result back to the storage type
    fn narrow(v: Self::Accum) -> Self;

    /// Zero value, used for row padding
    fn zero() -> Self;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
    type Accum = f64;

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(v: f64) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
    type Accum = f32;

    #[inline]
    fn widen(self) -> f32 {
        self
    }

    #[inline]
    fn narrow(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }
}

// ============================================================================
// Half-precision floating point (requires "f16" feature)
// ============================================================================

// f16 sums over long rows lose too much in f16, so accumulate in f32.
#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;
    type Accum = f32;

    #[inline]
    fn widen(self) -> f32 {
        self.to_f32()
    }

    #[inline]
    fn narrow(v: f32) -> Self {
        half::f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }
}
