//! Pairwise similarity kernels
//!
//! A kernel maps two feature vectors to a nonnegative similarity that is
//! symmetric and maximal when both vectors coincide. The forest uses kernels
//! only as an exit test: a region stops splitting once its members are, on
//! average, similar enough to the region's representative.
//!
//! Kernels are selected by identifier:
//!
//! | Identifier  | Kernel | Scaling vector |
//! |-------------|--------|----------------|
//! | `rbf`       | [`RbfKernel`] | first entry is the bandwidth σ |
//! | `matern-d1` | [`MaternKernel`], d=1 | one scale per input dimension |
//! | `matern-d3` | [`MaternKernel`], d=3 | one scale per input dimension |
//! | `matern-d5` | [`MaternKernel`], d=5 | one scale per input dimension |

mod matern;
mod rbf;

pub use matern::MaternKernel;
pub use rbf::RbfKernel;

use core::fmt;
use core::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::errors::{GenifError, GenifResult};

/// Similarity function over feature vectors
pub trait Kernel: fmt::Debug + Send + Sync {
    /// Kernel value k(x1, x2)
    fn value(&self, x1: ArrayView1<'_, f64>, x2: ArrayView1<'_, f64>) -> f64;

    /// Input dimensionality this kernel was configured for, if it is fixed
    fn dimensions(&self) -> Option<usize> {
        None
    }

    /// Fail with a dimension mismatch if `found` columns cannot be evaluated
    fn check_dimensions(&self, found: usize) -> GenifResult<()> {
        match self.dimensions() {
            Some(expected) if expected != found => {
                Err(GenifError::DimensionMismatch { expected, found })
            }
            _ => Ok(()),
        }
    }
}

/// Kernel identifiers accepted by the exit condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelKind {
    /// Radial basis function
    #[serde(rename = "rbf")]
    Rbf,
    /// Matérn kernel with d=1
    #[serde(rename = "matern-d1")]
    MaternD1,
    /// Matérn kernel with d=3
    #[serde(rename = "matern-d3")]
    MaternD3,
    /// Matérn kernel with d=5
    #[serde(rename = "matern-d5")]
    MaternD5,
}

impl KernelKind {
    /// All accepted identifiers
    pub const ALL: [KernelKind; 4] = [Self::Rbf, Self::MaternD1, Self::MaternD3, Self::MaternD5];

    /// Identifier as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rbf => "rbf",
            Self::MaternD1 => "matern-d1",
            Self::MaternD3 => "matern-d3",
            Self::MaternD5 => "matern-d5",
        }
    }

    /// Instantiate the kernel from its scaling vector
    ///
    /// RBF uses `scaling[0]` as bandwidth; the Matérn kernels use the whole
    /// vector as per-dimension scales.
    pub fn build(&self, scaling: &[f64]) -> GenifResult<Box<dyn Kernel>> {
        let kernel: Box<dyn Kernel> = match self {
            Self::Rbf => {
                let sigma = scaling.first().copied().ok_or(GenifError::InvalidConfig {
                    reason: "rbf kernel needs a bandwidth in the scaling vector",
                })?;
                Box::new(RbfKernel::new(sigma)?)
            }
            Self::MaternD1 => Box::new(MaternKernel::new(scaling.to_vec(), 1)?),
            Self::MaternD3 => Box::new(MaternKernel::new(scaling.to_vec(), 3)?),
            Self::MaternD5 => Box::new(MaternKernel::new(scaling.to_vec(), 5)?),
        };
        Ok(kernel)
    }
}

impl FromStr for KernelKind {
    type Err = GenifError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| GenifError::UnknownKernel { name: name.to_string() })
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
