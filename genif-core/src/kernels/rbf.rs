//! Radial basis function kernel
//!
//! k(x1, x2) = l² · exp(−‖x1 − x2‖² / (2σ²))

use ndarray::ArrayView1;

use super::Kernel;
use crate::errors::{GenifError, GenifResult};
use crate::spatial::squared_distance;

/// RBF kernel with bandwidth σ and output scale l
#[derive(Debug, Clone, PartialEq)]
pub struct RbfKernel {
    /// Bandwidth
    sigma: f64,
    /// Output scale
    l: f64,
    /// Cached l²
    l2: f64,
    /// Cached 2σ²
    denom: f64,
}

impl Default for RbfKernel {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            l: 1.0,
            l2: 1.0,
            denom: 2.0,
        }
    }
}

impl RbfKernel {
    /// Create an RBF kernel with unit output scale
    pub fn new(sigma: f64) -> GenifResult<Self> {
        Self::with_output_scale(sigma, 1.0)
    }

    /// Create an RBF kernel with bandwidth `sigma` and output scale `l`
    pub fn with_output_scale(sigma: f64, l: f64) -> GenifResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(GenifError::InvalidConfig {
                reason: "rbf bandwidth must be positive and finite",
            });
        }
        if !l.is_finite() {
            return Err(GenifError::InvalidConfig {
                reason: "rbf output scale must be finite",
            });
        }

        Ok(Self {
            sigma,
            l,
            l2: l * l,
            denom: 2.0 * sigma * sigma,
        })
    }

    /// Bandwidth σ
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Output scale l
    pub fn l(&self) -> f64 {
        self.l
    }
}

impl Kernel for RbfKernel {
    #[inline]
    fn value(&self, x1: ArrayView1<'_, f64>, x2: ArrayView1<'_, f64>) -> f64 {
        self.l2 * (-squared_distance(x1, x2) / self.denom).exp()
    }
}
