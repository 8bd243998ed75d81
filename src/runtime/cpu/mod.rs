//! CPU runtime implementation
//!
//! The host CPU stands in for a many-core accelerator: each execution unit is
//! one task on the rayon pool (or a plain loop iteration without the `rayon`
//! feature), with its own row buffers and a statically assigned set of rows.
//! Units never wait on each other and never share mutable state.

mod client;
mod device;
pub mod kernels;

pub use client::{CpuClient, ParallelismConfig};
pub use device::{CpuPlatform, DEFAULT_TRANSFER_GRANULARITY};
