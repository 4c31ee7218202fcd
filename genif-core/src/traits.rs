//! Learner capability shared by trees, ensembles and forests
//!
//! A learner is fitted on a dataset, keeps the fitted model, and predicts
//! with either its own model or one handed back to it. `copy` spawns a fresh,
//! unfitted learner from the construction parameters; it never clones fit
//! state, which is what lets an ensemble fan one prototype out to many
//! workers.

use ndarray::ArrayView2;

use crate::errors::GenifResult;

/// Fit / predict / copy contract
pub trait Learner: Sized + Send + Sync {
    /// What `fit` produces
    type Model: Send + Sync;
    /// What `predict` produces
    type Prediction: Send;

    /// Fit on `dataset` (rows are observations), replacing any previous model
    fn fit(&mut self, dataset: ArrayView2<'_, f64>) -> GenifResult<&mut Self>;

    /// Predict with the model from the last `fit`
    fn predict(&self, dataset: ArrayView2<'_, f64>) -> GenifResult<Self::Prediction>;

    /// Predict with an explicitly supplied model
    fn predict_with(
        &self,
        dataset: ArrayView2<'_, f64>,
        model: &Self::Model,
    ) -> GenifResult<Self::Prediction>;

    /// Fit on `dataset`, then predict on the same rows
    fn fit_predict(&mut self, dataset: ArrayView2<'_, f64>) -> GenifResult<Self::Prediction> {
        self.fit(dataset)?;
        self.predict(dataset)
    }

    /// The fitted model, if any
    fn model(&self) -> Option<&Self::Model>;

    /// Consume the learner, keeping only its fitted model
    fn into_model(self) -> Option<Self::Model>;

    /// Fresh, unfitted learner with the same construction parameters
    fn copy(&self) -> Self;

    /// Fresh learner for ensemble member `member`
    ///
    /// Learners with a random seed may derive a per-member seed here so
    /// members do not repeat each other's random draws.
    fn copy_for_member(&self, member: usize) -> Self {
        let _ = member;
        self.copy()
    }
}
