//! # pdistr
//!
//! **Condensed pairwise Minkowski distances with communication-free parallel tiling.**
//!
//! For N vectors of dimension M, pdistr computes `dist(x_i, x_j)` under the
//! L_p norm for every pair `i < j` and stores the results in a condensed
//! vector of length `N(N-1)/2` instead of a full symmetric matrix.
//!
//! ## How it is computed
//!
//! 1. **Plan** ([`tiling::plan`]): pad the row length to the platform's
//!    transfer granularity and decide how many execution units to activate.
//!    The result is a small immutable [`tiling::PdistTiling`].
//! 2. **Partition** ([`tiling::CyclicPartition`]): unit `u` of `U` owns rows
//!    `u, u+U, u+2U, ...` and every pair whose smaller index it owns.
//! 3. **Compute** ([`runtime::cpu::kernels::pdist_kernel`]): each unit streams
//!    its rows through local zero-padded buffers and writes each distance at
//!    `i*(2N-i-1)/2 + (j-i-1)`. Units write disjoint output ranges, so there
//!    is no merge step and no locking.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdistr::prelude::*;
//!
//! let data = [0.0f32, 0.0, 3.0, 4.0, 0.0, 0.0];
//! let x = MatrixRef::new(&data, 3, 2)?;
//! let client = CpuClient::new();
//!
//! assert_eq!(client.pdist(x, 2.0)?, vec![5.0, 0.0, 5.0]);
//! assert_eq!(client.pdist(x, 1.0)?, vec![7.0, 0.0, 7.0]);
//! # Ok::<(), pdistr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): run execution units on the rayon thread pool
//! - `f16`: half-precision inputs (`half::f16`), accumulated in f32

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod runtime;
pub mod tiling;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::matrix::MatrixRef;
    pub use crate::ops::{DistanceOps, Exponent, RootMode};
    pub use crate::runtime::cpu::{CpuClient, CpuPlatform, ParallelismConfig};
    pub use crate::runtime::{Platform, PlatformInfo};
    pub use crate::tiling::PdistTiling;
}
