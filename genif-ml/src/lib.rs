//! Generalized Isolation Forest
//!
//! ## Overview
//!
//! An unsupervised outlier detector. Each tree summarises a bootstrap sample
//! by recursively partitioning it into nested regions; every point is then
//! scored by how densely populated its region was in training data. Points in
//! sparse regions get low scores and are the outlier candidates.
//!
//! ## Algorithm
//!
//! ### Tree induction
//!
//! ```text
//! region = all rows, anchored at row 0
//! while some region is still open:
//!     if mean kernel(anchor, member) >= sigma: keep it as a leaf
//!     else: draw k distinct anchors, give every member to its nearest anchor,
//!           open each bucket with more than k members
//! ```
//!
//! Leaf anchors form the model's regions. A density pass then counts how many
//! sample rows are closest to each region; probability = count / (rows × cols).
//!
//! ### Forest
//!
//! `n_models` trees are fitted in parallel on bootstrap samples of
//! `sample_size` rows. The score of a row is the mean, across trees, of the
//! probability of its nearest region.
//!
//! ## Usage
//!
//! ```
//! use genif_ml::{ForestConfig, GeneralizedIsolationForest, Learner};
//! use ndarray::Array2;
//!
//! let data = Array2::from_shape_fn((40, 2), |(i, j)| ((i * 3 + j) % 7) as f64 * 0.1);
//! let config = ForestConfig::new(4, 8, 32, "rbf", vec![1.0], 0.6).with_seed(7);
//!
//! let mut forest = GeneralizedIsolationForest::new(config)?;
//! let scores = forest.fit_predict(data.view())?;
//! assert_eq!(scores.len(), 40);
//! # Ok::<(), genif_ml::GenifError>(())
//! ```
//!
//! ## Concurrency
//!
//! One `rayon` pool per forest, sized by `worker_count`. Split assignment,
//! density counting, prediction and ensemble fitting all run inside it; trees
//! fitted by a pool worker reuse the same threads.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod ensemble;
pub mod exit;
pub mod forest;
pub mod model;
pub mod node;
pub mod tree;

// Public API
pub use config::ForestConfig;
pub use ensemble::BaggingEnsemble;
pub use exit::ExitCondition;
pub use forest::{ForestStats, GeneralizedIsolationForest};
pub use genif_core::{ErrorKind, GenifError, GenifResult, KernelKind, Learner, WorkerPool};
pub use model::GifModel;
pub use node::{NodeId, PartitionNode, PartitionTree};
pub use tree::{GeneralizedIsolationTree, TreeConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
