//! Data type system for pdistr
//!
//! `DType` is the runtime tag for an element type. The planner only needs
//! its byte width, which decides how many elements fit in one transfer unit.

mod element;

pub use element::Element;

use std::fmt;

/// Floating-point element types a distance computation can run on
///
/// # Discriminant Values
///
/// Discriminants are stable and never renumbered: F64=0, F32=1, F16=2.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (most common)
    F32 = 1,
    /// 16-bit floating point (IEEE 754)
    F16 = 2,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 => 4,
            Self::F16 => 2,
        }
    }

    /// Short lowercase name used in log and error messages
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
