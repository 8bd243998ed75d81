//! CPU client: planning plus the distance ops entry points

use super::device::CpuPlatform;
use super::kernels::{self, Workspace};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::MatrixRef;
use crate::ops::distance_common::validate_condensed_length;
use crate::ops::{DistanceOps, RootMode};
use crate::tiling::{self, PdistTiling};

/// How many execution units the CPU client may activate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    max_units: Option<usize>,
}

impl ParallelismConfig {
    /// `None` uses the host's parallelism
    pub fn new(max_units: Option<usize>) -> Self {
        Self { max_units }
    }

    /// Configured unit cap, if any
    pub fn max_units(&self) -> Option<usize> {
        self.max_units
    }
}

/// CPU client for pdist planning and dispatch
#[derive(Clone, Debug, Default)]
pub struct CpuClient {
    platform: CpuPlatform,
    root: RootMode,
}

impl CpuClient {
    /// Create a client on the host CPU with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the platform description
    pub fn with_platform(mut self, platform: CpuPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Limit the number of execution units
    pub fn with_parallelism(mut self, config: ParallelismConfig) -> Self {
        if let Some(units) = config.max_units() {
            self.platform = self.platform.with_units(units);
        }
        self
    }

    /// Choose whether the general-p path applies the final root
    pub fn with_root_mode(mut self, root: RootMode) -> Self {
        self.root = root;
        self
    }

    /// The configured root mode
    pub fn root_mode(&self) -> RootMode {
        self.root
    }

    /// The platform this client plans against
    pub fn platform(&self) -> &CpuPlatform {
        &self.platform
    }

    /// Plan a pdist over an `[n, m]` input of `T` with exponent `p`.
    ///
    /// # Errors
    ///
    /// `InvalidShape`, `InvalidArgument` for a bad `p`, or
    /// `PlatformUnavailable`.
    pub fn plan<T: Element>(&self, shape: [usize; 2], p: f32) -> Result<PdistTiling> {
        tiling::plan_on(shape, p, T::DTYPE.size_in_bytes(), &self.platform)
    }

    /// Run a planned pdist with a caller-held workspace.
    ///
    /// This is the low-level entry point: `tiling` must come from
    /// [`CpuClient::plan`] (or a decoded record) for the same shape. The
    /// workspace is resized if it was built for a different tiling.
    ///
    /// # Errors
    ///
    /// `InvalidShape` if `x` or `out` does not match `tiling`.
    pub fn compute_pdist<T: Element>(
        &self,
        x: MatrixRef<'_, T>,
        out: &mut [T],
        workspace: &mut Workspace<T>,
        tiling: &PdistTiling,
    ) -> Result<()> {
        kernels::pdist_kernel(x, out, tiling, self.root, workspace)
    }
}

impl DistanceOps for CpuClient {
    fn pdist<T: Element>(&self, x: MatrixRef<'_, T>, p: f32) -> Result<Vec<T>> {
        let tiling = self.plan::<T>(x.shape(), p)?;
        let mut out = vec![T::zero(); tiling.output_len()];
        let mut workspace = Workspace::new(&tiling);
        self.compute_pdist(x, &mut out, &mut workspace, &tiling)?;
        Ok(out)
    }

    fn pdist_into<T: Element>(&self, x: MatrixRef<'_, T>, p: f32, out: &mut [T]) -> Result<()> {
        validate_condensed_length(out.len(), x.rows(), "pdist")?;
        let tiling = self.plan::<T>(x.shape(), p)?;
        let mut workspace = Workspace::new(&tiling);
        self.compute_pdist(x, out, &mut workspace, &tiling)
    }

    fn squareform<T: Element>(&self, condensed: &[T], n: usize) -> Result<Vec<T>> {
        validate_condensed_length(condensed.len(), n, "squareform")?;
        let size = n
            .checked_mul(n)
            .ok_or_else(|| Error::invalid_shape(format!("squareform n={} overflows", n)))?;
        let mut square = vec![T::zero(); size];
        kernels::squareform_kernel(condensed, &mut square, n);
        Ok(square)
    }

    fn squareform_inverse<T: Element>(&self, square: MatrixRef<'_, T>) -> Result<Vec<T>> {
        let [n, m] = square.shape();
        if n != m {
            return Err(Error::invalid_shape(format!(
                "squareform_inverse expects square matrix, got [{}, {}]",
                n, m
            )));
        }
        let mut condensed = vec![T::zero(); kernels::condensed_len(n)];
        kernels::squareform_inverse_kernel(square.as_slice(), &mut condensed, n);
        Ok(condensed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdist_euclidean() {
        // X = [[0, 0], [1, 0], [0, 1]]
        let data = [0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0];
        let x = MatrixRef::new(&data, 3, 2).unwrap();
        let out = CpuClient::new().pdist(x, 2.0).unwrap();

        // d(0,1) = 1, d(0,2) = 1, d(1,2) = sqrt(2)
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], 1.0);
        assert!((out[2] - 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_pdist_rejects_bad_p() {
        let data = [0.0f32; 4];
        let x = MatrixRef::new(&data, 2, 2).unwrap();
        let client = CpuClient::new();
        assert!(matches!(
            client.pdist(x, 0.0),
            Err(Error::InvalidArgument { arg: "p", .. })
        ));
        assert!(client.pdist(x, f32::NAN).is_err());
    }

    #[test]
    fn test_pdist_into_checks_length() {
        let data = [0.0f32; 6];
        let x = MatrixRef::new(&data, 3, 2).unwrap();
        let mut out = [7.0f32; 2];
        assert!(matches!(
            CpuClient::new().pdist_into(x, 2.0, &mut out),
            Err(Error::InvalidShape { .. })
        ));
        assert_eq!(out, [7.0, 7.0]);
    }

    #[test]
    fn test_root_mode_switch() {
        let data = [0.0f64, 0.0, 3.0, 4.0];
        let x = MatrixRef::new(&data, 2, 2).unwrap();
        let rooted = CpuClient::new().pdist(x, 3.0).unwrap();
        let raw = CpuClient::new()
            .with_root_mode(RootMode::PowerSumOnly)
            .pdist(x, 3.0)
            .unwrap();
        assert!((raw[0] - 91.0).abs() < 1e-9);
        assert!((rooted[0] - 91.0f64.cbrt()).abs() < 1e-9);
    }

    #[test]
    fn test_parallelism_caps_units() {
        let client = CpuClient::new().with_parallelism(ParallelismConfig::new(Some(3)));
        let tiling = client.plan::<f32>([100, 4], 2.0).unwrap();
        assert_eq!(tiling.active_units(), 3);
        let tiling = client.plan::<f32>([2, 4], 2.0).unwrap();
        assert_eq!(tiling.active_units(), 1);
    }

    #[test]
    fn test_squareform_roundtrip_shape() {
        let client = CpuClient::new();
        let square = client.squareform(&[1.0f32, 2.0, 3.0], 3).unwrap();
        assert_eq!(square.len(), 9);
        let sq = MatrixRef::new(&square, 3, 3).unwrap();
        assert_eq!(client.squareform_inverse(sq).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(client.squareform(&[1.0f32, 2.0], 3).is_err());
    }
}
