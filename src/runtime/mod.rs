//! Runtime backends for pairwise distance computation
//!
//! A backend answers one question for the planner: how many independent
//! execution units it has and how coarse its row transfers are. Everything
//! else is decided by [`crate::tiling::plan`].
//!
//! ```text
//! Platform (capability query)
//! └── PlatformInfo { units, transfer_granularity }
//!         └── tiling::plan ──> PdistTiling ──> cpu::kernels::pdist
//! ```

pub mod cpu;

/// Capability numbers reported by a platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Number of independent execution units available
    pub units: usize,
    /// Minimum transfer size in bytes; row buffers are padded to a multiple of it
    pub transfer_granularity: usize,
}

impl PlatformInfo {
    /// Create platform info from a unit count and a transfer granularity in bytes
    pub const fn new(units: usize, transfer_granularity: usize) -> Self {
        Self {
            units,
            transfer_granularity,
        }
    }
}

/// Platform capability query.
///
/// Returns `None` when the platform cannot describe itself, which the planner
/// surfaces as [`crate::error::Error::PlatformUnavailable`].
pub trait Platform {
    /// Human-readable backend name
    fn name(&self) -> &'static str;

    /// Query the platform's unit count and transfer granularity
    fn query(&self) -> Option<PlatformInfo>;
}

/// A platform with fixed, caller-supplied capabilities.
///
/// Useful for reproducing another device's tiling on the host.
#[derive(Copy, Clone, Debug)]
pub struct StaticPlatform(pub PlatformInfo);

impl Platform for StaticPlatform {
    fn name(&self) -> &'static str {
        "static"
    }

    fn query(&self) -> Option<PlatformInfo> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_platform_reports_info() {
        let p = StaticPlatform(PlatformInfo::new(48, 32));
        assert_eq!(p.query(), Some(PlatformInfo::new(48, 32)));
        assert_eq!(p.name(), "static");
    }
}
