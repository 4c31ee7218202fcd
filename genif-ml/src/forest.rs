//! Generalized Isolation Forest
//!
//! Wires one shared [`ExitCondition`], one tree prototype and one bagging
//! ensemble together behind the user-facing hyperparameters. The score of a
//! row is the mean, over all fitted trees, of the probability of the region
//! it falls into. Low scores mark outliers.

use std::sync::Arc;

use genif_core::{GenifError, GenifResult, Learner, WorkerPool};
use ndarray::{Array1, ArrayView2};

use crate::config::ForestConfig;
use crate::ensemble::BaggingEnsemble;
use crate::exit::ExitCondition;
use crate::model::GifModel;
use crate::tree::{GeneralizedIsolationTree, TreeConfig};

/// Generalized Isolation Forest for outlier detection
#[derive(Debug)]
pub struct GeneralizedIsolationForest {
    config: ForestConfig,
    ensemble: BaggingEnsemble<GeneralizedIsolationTree>,
}

impl GeneralizedIsolationForest {
    /// Build an unfitted forest
    pub fn new(config: ForestConfig) -> GenifResult<Self> {
        config.validate()?;

        let pool = WorkerPool::from_request(config.worker_count)?;
        let exit = Arc::new(ExitCondition::from_kind(
            config.kernel_kind()?,
            &config.kernel_scaling,
            config.sigma,
        )?);

        // Tree seeds start after the bootstrap seeds so the two streams never coincide
        let tree_seed = config.seed.map(|s| s.wrapping_add(config.n_models as u64));
        let prototype = GeneralizedIsolationTree::new(
            TreeConfig {
                k: config.k,
                seed: tree_seed,
            },
            exit,
            pool.clone(),
        )?;
        let ensemble = BaggingEnsemble::new(prototype, config.n_models, config.sample_size, pool, config.seed)?;

        Ok(Self { config, ensemble })
    }

    /// Forest configuration
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Fitted tree models, empty before the first fit
    pub fn models(&self) -> &[GifModel] {
        self.ensemble.models()
    }

    /// The underlying ensemble
    pub fn ensemble(&self) -> &BaggingEnsemble<GeneralizedIsolationTree> {
        &self.ensemble
    }

    /// Get forest statistics
    pub fn stats(&self) -> ForestStats {
        let models = self.models();
        let total_regions = models.iter().map(GifModel::num_regions).sum();
        let max_regions = models.iter().map(GifModel::num_regions).max().unwrap_or(0);
        let dimensions = models.first().map_or(0, GifModel::dimensions);

        ForestStats {
            num_trees: models.len(),
            total_regions,
            max_regions,
            sample_size: self.config.sample_size,
            normalization: (self.config.sample_size * dimensions) as f64,
        }
    }

    /// Mean region probability per row across `models`
    fn average(&self, dataset: ArrayView2<'_, f64>, models: &[GifModel]) -> GenifResult<Array1<f64>> {
        if models.is_empty() {
            return Err(GenifError::NotFitted);
        }

        let tree = self.ensemble.prototype();
        let mut scores = Array1::zeros(dataset.nrows());
        for model in models {
            scores += &tree.predict_with(dataset, model)?;
        }
        scores /= models.len() as f64;
        Ok(scores)
    }
}

impl Learner for GeneralizedIsolationForest {
    type Model = Vec<GifModel>;
    type Prediction = Array1<f64>;

    fn fit(&mut self, dataset: ArrayView2<'_, f64>) -> GenifResult<&mut Self> {
        self.ensemble.fit(dataset)?;
        Ok(self)
    }

    fn predict(&self, dataset: ArrayView2<'_, f64>) -> GenifResult<Array1<f64>> {
        self.average(dataset, self.ensemble.models())
    }

    fn predict_with(&self, dataset: ArrayView2<'_, f64>, models: &Vec<GifModel>) -> GenifResult<Array1<f64>> {
        self.average(dataset, models)
    }

    fn model(&self) -> Option<&Vec<GifModel>> {
        self.ensemble.model()
    }

    fn into_model(self) -> Option<Vec<GifModel>> {
        self.ensemble.into_model()
    }

    fn copy(&self) -> Self {
        Self {
            config: self.config.clone(),
            ensemble: self.ensemble.copy(),
        }
    }
}

/// Forest statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestStats {
    /// Number of fitted trees
    pub num_trees: usize,
    /// Regions across all trees
    pub total_regions: usize,
    /// Regions of the largest tree
    pub max_regions: usize,
    /// Bootstrap rows per tree
    pub sample_size: usize,
    /// Divisor turning region counts into probabilities (rows × columns)
    pub normalization: f64,
}
