//! Distance operations
//!
//! The `DistanceOps` trait is the public entry point; backends implement it
//! on their client type. Validation shared by every backend lives in
//! `distance_common`.

mod distance;
pub mod distance_common;

pub use distance::{DistanceOps, Exponent, RootMode};
pub use distance_common::pdist_output_shape;
