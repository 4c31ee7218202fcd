//! Core primitives for Generalized Isolation Forests
//!
//! Everything the forest consumes but does not own algorithmically:
//!
//! - [`kernels`]: similarity functions used as the partitioning exit test
//! - [`spatial`]: nearest-neighbour index over leaf representatives
//! - [`workers`]: explicitly sized thread pool for data-parallel loops
//! - [`traits`]: the [`Learner`] contract shared by trees, ensembles, forests
//! - [`errors`]: the error taxonomy
//!
//! ```
//! use genif_core::{Kernel, KernelKind};
//! use ndarray::array;
//!
//! let kernel = "rbf".parse::<KernelKind>()?.build(&[1.0])?;
//! let x = array![0.0, 1.0];
//! assert_eq!(kernel.value(x.view(), x.view()), 1.0);
//! # Ok::<(), genif_core::GenifError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod kernels;
pub mod spatial;
pub mod traits;
pub mod workers;

// Public API
pub use errors::{ErrorKind, GenifError, GenifResult};
pub use kernels::{Kernel, KernelKind, MaternKernel, RbfKernel};
pub use spatial::{squared_distance, KdTree};
pub use traits::Learner;
pub use workers::{resolve_worker_count, WorkerPool};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
