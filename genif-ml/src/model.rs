//! Region density model
//!
//! The fitted artifact of one tree: the leaf representatives of the
//! partition, a nearest-neighbour index over them, and how many training rows
//! fell closest to each leaf. A query row is scored with the probability of
//! the leaf nearest to it; higher means more typical.
//!
//! ## Normalisation
//!
//! Counts are divided by the total element count (rows × columns) of the
//! dataset used for the density pass, not by the row count. Probabilities
//! therefore sum to `1 / columns`. Rankings are unaffected.

use std::sync::atomic::{AtomicU64, Ordering};

use genif_core::{GenifError, GenifResult, KdTree, WorkerPool};
use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

/// Leaf summary, spatial index and per-region probabilities of one tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "ModelParts", try_from = "ModelParts")]
pub struct GifModel {
    index: KdTree,
    counts: Vec<u64>,
    probabilities: Vec<f64>,
}

impl GifModel {
    /// Build the model from leaf representatives and run the density pass
    ///
    /// Every row of `dataset` is assigned to its nearest leaf; the per-leaf
    /// counters are atomic so rows can be counted in parallel.
    pub fn from_leaves(
        leaves: Array2<f64>,
        dataset: ArrayView2<'_, f64>,
        pool: &WorkerPool,
    ) -> GenifResult<Self> {
        if leaves.nrows() == 0 {
            return Err(GenifError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        if leaves.ncols() != dataset.ncols() {
            return Err(GenifError::FeatureMismatch {
                expected: leaves.ncols(),
                found: dataset.ncols(),
            });
        }

        let index = KdTree::build(leaves);
        let counters: Vec<AtomicU64> = (0..index.len()).map(|_| AtomicU64::new(0)).collect();

        pool.install(|| {
            dataset.axis_iter(Axis(0)).into_par_iter().for_each(|row| {
                if let Some((leaf, _)) = index.nearest(row) {
                    counters[leaf].fetch_add(1, Ordering::Relaxed);
                }
            });
        });

        let counts: Vec<u64> = counters.into_iter().map(AtomicU64::into_inner).collect();
        let normalization = (dataset.nrows() * dataset.ncols()) as f64;
        let probabilities = counts.iter().map(|&c| c as f64 / normalization).collect();

        Ok(Self {
            index,
            counts,
            probabilities,
        })
    }

    /// Leaf representative vectors, one row per region
    pub fn leaves(&self) -> ArrayView2<'_, f64> {
        self.index.points()
    }

    /// Training rows nearest to each region
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Probability of each region
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of regions (leaves)
    pub fn num_regions(&self) -> usize {
        self.counts.len()
    }

    /// Feature count the model was fitted on
    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    /// Number of rows seen by the density pass
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Region nearest to `point`
    pub fn nearest_region(&self, point: ArrayView1<'_, f64>) -> Option<usize> {
        self.index.nearest(point).map(|(leaf, _)| leaf)
    }

    /// Probability of the region nearest to each row of `dataset`
    pub fn predict(&self, dataset: ArrayView2<'_, f64>, pool: &WorkerPool) -> GenifResult<Array1<f64>> {
        if self.probabilities.is_empty() {
            return Err(GenifError::NotFitted);
        }
        if dataset.ncols() != self.dimensions() {
            return Err(GenifError::FeatureMismatch {
                expected: self.dimensions(),
                found: dataset.ncols(),
            });
        }

        let mut scores = Array1::zeros(dataset.nrows());
        pool.install(|| {
            Zip::from(&mut scores)
                .and(dataset.rows())
                .par_for_each(|score, row| {
                    *score = self
                        .nearest_region(row)
                        .map_or(0.0, |leaf| self.probabilities[leaf]);
                });
        });
        Ok(scores)
    }
}

/// Serialized form; the spatial index is rebuilt on load
#[derive(Serialize, Deserialize)]
struct ModelParts {
    leaves: Array2<f64>,
    counts: Vec<u64>,
    probabilities: Vec<f64>,
}

impl From<GifModel> for ModelParts {
    fn from(model: GifModel) -> Self {
        Self {
            leaves: model.index.points().to_owned(),
            counts: model.counts,
            probabilities: model.probabilities,
        }
    }
}

impl TryFrom<ModelParts> for GifModel {
    type Error = GenifError;

    fn try_from(parts: ModelParts) -> Result<Self, Self::Error> {
        let regions = parts.leaves.nrows();
        if parts.counts.len() != regions || parts.probabilities.len() != regions {
            return Err(GenifError::InvalidConfig {
                reason: "model needs one count and one probability per leaf",
            });
        }
        Ok(Self {
            index: KdTree::build(parts.leaves),
            counts: parts.counts,
            probabilities: parts.probabilities,
        })
    }
}
