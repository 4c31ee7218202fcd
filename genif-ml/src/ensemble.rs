//! Bagging ensemble
//!
//! Fits `n_models` copies of a prototype learner, each on its own bootstrap
//! sample, across the shared worker pool. Members are independent: a member
//! only needs the prototype's `copy` and the read-only dataset. Fitted models
//! are gathered under a mutex and put back into member order once every
//! member has finished, so the stored order does not depend on scheduling.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use genif_core::{GenifError, GenifResult, Learner, WorkerPool};
use log::info;
use ndarray::{ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Bootstrap-aggregating ensemble over any [`Learner`]
pub struct BaggingEnsemble<L: Learner> {
    prototype: L,
    n_models: usize,
    sample_size: usize,
    pool: WorkerPool,
    seed: Option<u64>,
    models: Vec<L::Model>,
}

impl<L: Learner> BaggingEnsemble<L> {
    /// Create an unfitted ensemble
    ///
    /// Member `i` draws its bootstrap sample from `seed + i`, or from OS
    /// entropy when `seed` is `None`.
    pub fn new(
        prototype: L,
        n_models: usize,
        sample_size: usize,
        pool: WorkerPool,
        seed: Option<u64>,
    ) -> GenifResult<Self> {
        if n_models == 0 {
            return Err(GenifError::InvalidConfig {
                reason: "n_models must be greater than 0",
            });
        }
        if sample_size == 0 {
            return Err(GenifError::InvalidConfig {
                reason: "sample_size must be greater than 0",
            });
        }
        Ok(Self {
            prototype,
            n_models,
            sample_size,
            pool,
            seed,
            models: Vec::new(),
        })
    }

    /// Configured number of members
    pub fn num_models(&self) -> usize {
        self.n_models
    }

    /// Number of models from the last successful fit
    pub fn fitted_models(&self) -> usize {
        self.models.len()
    }

    /// Fitted models in member order
    pub fn models(&self) -> &[L::Model] {
        &self.models
    }

    /// Rows drawn per member
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// The learner every member is copied from
    pub fn prototype(&self) -> &L {
        &self.prototype
    }
}

/// Bootstrap RNG of ensemble member `member`
fn member_rng(seed: Option<u64>, member: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(member as u64)),
        None => StdRng::from_entropy(),
    }
}

impl<L: Learner> Learner for BaggingEnsemble<L> {
    type Model = Vec<L::Model>;
    type Prediction = Vec<L::Prediction>;

    fn fit(&mut self, dataset: ArrayView2<'_, f64>) -> GenifResult<&mut Self> {
        self.models.clear();
        if dataset.nrows() == 0 {
            return Err(GenifError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        info!(
            "Fitting {} models on bootstrap samples of {} rows drawn from {} rows ({} workers)",
            self.n_models,
            self.sample_size,
            dataset.nrows(),
            self.pool.workers()
        );

        let fitted: Mutex<Vec<(usize, L::Model)>> = Mutex::new(Vec::with_capacity(self.n_models));
        let prototype = &self.prototype;
        let (rows, sample_size, seed) = (dataset.nrows(), self.sample_size, self.seed);

        self.pool.install(|| {
            (0..self.n_models).into_par_iter().try_for_each(|member| -> GenifResult<()> {
                let mut rng = member_rng(seed, member);
                let sample_rows: Vec<usize> = (0..sample_size).map(|_| rng.gen_range(0..rows)).collect();
                let sample = dataset.select(Axis(0), &sample_rows);

                let mut learner = prototype.copy_for_member(member);
                learner.fit(sample.view())?;
                let model = learner.into_model().ok_or(GenifError::NotFitted)?;

                fitted
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((member, model));
                Ok(())
            })
        })?;

        let mut fitted = fitted.into_inner().unwrap_or_else(PoisonError::into_inner);
        fitted.sort_by_key(|(member, _)| *member);
        self.models = fitted.into_iter().map(|(_, model)| model).collect();

        info!("Ensemble fitted: {} models", self.models.len());
        Ok(self)
    }

    fn predict(&self, dataset: ArrayView2<'_, f64>) -> GenifResult<Self::Prediction> {
        if self.models.is_empty() {
            return Err(GenifError::NotFitted);
        }
        self.predict_with(dataset, &self.models)
    }

    fn predict_with(
        &self,
        dataset: ArrayView2<'_, f64>,
        models: &Vec<L::Model>,
    ) -> GenifResult<Self::Prediction> {
        models
            .iter()
            .map(|model| self.prototype.predict_with(dataset, model))
            .collect()
    }

    fn model(&self) -> Option<&Vec<L::Model>> {
        if self.models.is_empty() {
            None
        } else {
            Some(&self.models)
        }
    }

    fn into_model(self) -> Option<Vec<L::Model>> {
        if self.models.is_empty() {
            None
        } else {
            Some(self.models)
        }
    }

    fn copy(&self) -> Self {
        Self {
            prototype: self.prototype.copy(),
            n_models: self.n_models,
            sample_size: self.sample_size,
            pool: self.pool.clone(),
            seed: self.seed,
            models: Vec::new(),
        }
    }
}

impl<L: Learner> fmt::Debug for BaggingEnsemble<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaggingEnsemble")
            .field("n_models", &self.n_models)
            .field("sample_size", &self.sample_size)
            .field("seed", &self.seed)
            .field("fitted_models", &self.models.len())
            .field("pool", &self.pool)
            .finish()
    }
}
