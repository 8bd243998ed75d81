//! CPU platform implementation

use crate::runtime::{Platform, PlatformInfo};

/// Default row transfer granularity in bytes (one 256-bit vector)
pub const DEFAULT_TRANSFER_GRANULARITY: usize = 32;

/// The host CPU seen as a set of execution units.
///
/// Unit count is rayon's thread count when the `rayon` feature is on,
/// otherwise `std::thread::available_parallelism`. A fixed count can be forced
/// with [`CpuPlatform::with_units`].
#[derive(Clone, Debug)]
pub struct CpuPlatform {
    units: Option<usize>,
    transfer_granularity: usize,
}

impl Default for CpuPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuPlatform {
    /// Create a CPU platform that reports the host's parallelism
    pub fn new() -> Self {
        Self {
            units: None,
            transfer_granularity: DEFAULT_TRANSFER_GRANULARITY,
        }
    }

    /// Report exactly `units` execution units
    pub fn with_units(mut self, units: usize) -> Self {
        self.units = Some(units);
        self
    }

    /// Report a different transfer granularity (bytes)
    pub fn with_transfer_granularity(mut self, bytes: usize) -> Self {
        self.transfer_granularity = bytes;
        self
    }
}

impl Platform for CpuPlatform {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn query(&self) -> Option<PlatformInfo> {
        let units = match self.units {
            Some(u) => u,
            None => host_units()?,
        };
        Some(PlatformInfo::new(units, self.transfer_granularity))
    }
}

#[cfg(feature = "rayon")]
fn host_units() -> Option<usize> {
    Some(rayon::current_num_threads())
}

#[cfg(not(feature = "rayon"))]
fn host_units() -> Option<usize> {
    std::thread::available_parallelism().ok().map(|n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_query_has_units() {
        let info = CpuPlatform::new().query().unwrap();
        assert!(info.units >= 1);
        assert_eq!(info.transfer_granularity, DEFAULT_TRANSFER_GRANULARITY);
    }

    #[test]
    fn test_forced_units() {
        let info = CpuPlatform::new()
            .with_units(7)
            .with_transfer_granularity(64)
            .query()
            .unwrap();
        assert_eq!(info, PlatformInfo::new(7, 64));
    }
}
