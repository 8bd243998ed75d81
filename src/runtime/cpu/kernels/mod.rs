//! CPU kernel implementations
//!
//! Low-level pieces of the pdist engine. Kernels are generic over
//! `T: Element` and operate on plain slices; validation happens in the
//! client before anything here runs.

pub mod condensed;
pub mod minkowski;
pub mod pdist;
pub mod row_buffer;

// Re-export kernel functions for convenient access
pub use condensed::{
    condensed_index, condensed_len, condensed_to_pair, row_start, squareform_inverse_kernel,
    squareform_kernel,
};
pub use minkowski::{LOG_EPSILON, pairwise_distance};
pub use pdist::{Workspace, pdist_kernel};
pub use row_buffer::{DoubleBuffer, RowBuffer};
