//! Generalized isolation tree
//!
//! A tree is induced by repeatedly splitting a region around k representatives
//! drawn from its members. Every member joins the bucket of its nearest
//! representative, each bucket becomes a child region, and splitting stops
//! where the [`ExitCondition`] says a region is compact enough or where a
//! region has no more than k members. Only the leaves survive the fit: their
//! representatives become the [`GifModel`] regions.

use std::sync::Arc;

use genif_core::{squared_distance, GenifError, GenifResult, Learner, WorkerPool};
use log::{debug, trace, warn};
use ndarray::{Array1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::exit::ExitCondition;
use crate::model::GifModel;
use crate::node::{NodeId, PartitionNode, PartitionTree};

/// Configuration for a generalized isolation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Representatives drawn per split
    pub k: usize,
    /// Seed for representative sampling, OS entropy if `None`
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            k: 10,
            seed: None,
        }
    }
}

/// Tree builder and single-tree learner
#[derive(Debug)]
pub struct GeneralizedIsolationTree {
    config: TreeConfig,
    exit: Arc<ExitCondition>,
    pool: WorkerPool,
    model: Option<GifModel>,
}

impl GeneralizedIsolationTree {
    /// Create an unfitted tree
    pub fn new(config: TreeConfig, exit: Arc<ExitCondition>, pool: WorkerPool) -> GenifResult<Self> {
        if config.k < 2 {
            return Err(GenifError::InvalidConfig {
                reason: "k must be at least 2",
            });
        }
        Ok(Self {
            config,
            exit,
            pool,
            model: None,
        })
    }

    /// Tree configuration
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Shared exit condition
    pub fn exit(&self) -> &ExitCondition {
        &self.exit
    }

    /// Partition `dataset` without building a model
    pub fn induce(&self, dataset: ArrayView2<'_, f64>) -> GenifResult<PartitionTree> {
        let mut rng = self.rng();
        self.induce_with(dataset, &mut rng)
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn check_dataset(&self, dataset: ArrayView2<'_, f64>) -> GenifResult<()> {
        self.exit.check_dimensions(dataset.ncols())?;
        if dataset.nrows() < self.config.k {
            return Err(GenifError::InsufficientData {
                required: self.config.k,
                available: dataset.nrows(),
            });
        }
        Ok(())
    }

    fn induce_with(&self, dataset: ArrayView2<'_, f64>, rng: &mut StdRng) -> GenifResult<PartitionTree> {
        self.check_dataset(dataset)?;

        let k = self.config.k;
        let mut tree = PartitionTree::with_root(dataset.nrows());
        let mut work: Vec<NodeId> = vec![PartitionTree::ROOT];

        while let Some(id) = work.pop() {
            let node = tree.node(id);
            if self.exit.should_exit(dataset, node) {
                continue;
            }

            let buckets = self.split(dataset, node, rng)?;
            trace!(
                "Split node {} (depth {}, {} rows) into {} regions",
                id,
                node.depth,
                node.len(),
                buckets.len()
            );

            for (representative, indices) in buckets {
                let splittable = indices.len() > k;
                let child = tree.add_child(id, indices, representative);
                if splittable {
                    work.push(child);
                }
            }
        }

        Ok(tree)
    }

    /// Draw k distinct representatives and bucket every member by its nearest one
    fn split(
        &self,
        dataset: ArrayView2<'_, f64>,
        node: &PartitionNode,
        rng: &mut StdRng,
    ) -> GenifResult<Vec<(usize, Vec<usize>)>> {
        let k = self.config.k;
        let mut representatives: Vec<usize> = Vec::with_capacity(k);
        while representatives.len() < k {
            let candidate = node.indices[rng.gen_range(0..node.len())];
            if !representatives.contains(&candidate) {
                representatives.push(candidate);
            }
        }

        let assignment: Vec<usize> = self.pool.install(|| {
            node.indices
                .par_iter()
                .map(|&row| nearest_representative(dataset, row, &representatives))
                .collect()
        });

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (&row, &bucket) in node.indices.iter().zip(&assignment) {
            buckets[bucket].push(row);
        }

        let filled = buckets.iter().filter(|b| !b.is_empty()).count();
        if filled < k {
            return Err(GenifError::DegeneratePartition {
                expected: k,
                found: filled,
                observations: node.len(),
            });
        }

        Ok(representatives.into_iter().zip(buckets).collect())
    }
}

/// Position of the representative nearest to `row`
///
/// A representative always claims itself; otherwise the first minimum wins.
fn nearest_representative(dataset: ArrayView2<'_, f64>, row: usize, representatives: &[usize]) -> usize {
    if let Some(own) = representatives.iter().position(|&r| r == row) {
        return own;
    }
    let point = dataset.row(row);
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (position, &rep) in representatives.iter().enumerate() {
        let distance = squared_distance(point, dataset.row(rep));
        if distance < best_distance {
            best = position;
            best_distance = distance;
        }
    }
    best
}

impl Learner for GeneralizedIsolationTree {
    type Model = GifModel;
    type Prediction = Array1<f64>;

    fn fit(&mut self, dataset: ArrayView2<'_, f64>) -> GenifResult<&mut Self> {
        self.model = None;

        let mut rng = self.rng();
        let tree = self.induce_with(dataset, &mut rng)?;
        let representatives = tree.leaf_representatives();

        if tree.len() == 1 {
            warn!(
                "All {} rows stayed in the root region; the model has a single region",
                dataset.nrows()
            );
        }

        let leaves = dataset.select(Axis(0), &representatives);
        let model = GifModel::from_leaves(leaves, dataset, &self.pool)?;

        debug!(
            "Tree fitted: {} rows, {} splits, {} regions, depth {}",
            dataset.nrows(),
            tree.len() - representatives.len(),
            model.num_regions(),
            tree.depth()
        );

        self.model = Some(model);
        Ok(self)
    }

    fn predict(&self, dataset: ArrayView2<'_, f64>) -> GenifResult<Array1<f64>> {
        let model = self.model.as_ref().ok_or(GenifError::NotFitted)?;
        self.predict_with(dataset, model)
    }

    fn predict_with(&self, dataset: ArrayView2<'_, f64>, model: &GifModel) -> GenifResult<Array1<f64>> {
        model.predict(dataset, &self.pool)
    }

    fn model(&self) -> Option<&GifModel> {
        self.model.as_ref()
    }

    fn into_model(self) -> Option<GifModel> {
        self.model
    }

    fn copy(&self) -> Self {
        Self {
            config: self.config,
            exit: Arc::clone(&self.exit),
            pool: self.pool.clone(),
            model: None,
        }
    }

    fn copy_for_member(&self, member: usize) -> Self {
        let mut copy = self.copy();
        copy.config.seed = self.config.seed.map(|s| s.wrapping_add(member as u64));
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    fn tree(k: usize, kernel: &str, scaling: &[f64], sigma: f64, seed: u64) -> GeneralizedIsolationTree {
        let exit = Arc::new(ExitCondition::new(kernel, scaling, sigma).unwrap());
        let pool = WorkerPool::new(1).unwrap();
        GeneralizedIsolationTree::new(TreeConfig { k, seed: Some(seed) }, exit, pool).unwrap()
    }

    fn grid(rows: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, 2), |(i, j)| if j == 0 { (i % 7) as f64 } else { (i / 7) as f64 * 3.0 })
    }

    #[test]
    fn test_k_below_two_rejected() {
        let exit = Arc::new(ExitCondition::new("rbf", &[1.0], 0.5).unwrap());
        let pool = WorkerPool::new(1).unwrap();
        let err = GeneralizedIsolationTree::new(TreeConfig { k: 1, seed: None }, exit, pool).err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_fewer_rows_than_k() {
        let data = array![[0.0, 0.0], [1.0, 1.0]];
        let mut gif = tree(3, "rbf", &[1.0], 0.5, 1);
        let err = gif.fit(data.view()).err().unwrap();
        assert_eq!(err, GenifError::InsufficientData { required: 3, available: 2 });
        assert!(err.is_precondition());
        assert!(gif.model().is_none());
    }

    #[test]
    fn test_kernel_dimensions_checked_before_partitioning() {
        let data = grid(20);
        let mut gif = tree(2, "matern-d3", &[1.0, 1.0, 1.0], 0.5, 1);
        let err = gif.fit(data.view()).err().unwrap();
        assert_eq!(err, GenifError::DimensionMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_compact_data_stays_one_region() {
        let data = Array2::from_elem((12, 3), 2.5);
        let mut gif = tree(4, "rbf", &[1.0], 0.5, 7);
        gif.fit(data.view()).unwrap();

        let model = gif.model().unwrap();
        assert_eq!(model.num_regions(), 1);
        assert_eq!(model.counts(), &[12]);
        assert_eq!(model.probabilities(), &[12.0 / 36.0]);
    }

    #[test]
    fn test_counts_cover_every_row() {
        let data = grid(49);
        let mut gif = tree(3, "rbf", &[1.0], 0.95, 11);
        gif.fit(data.view()).unwrap();

        let model = gif.model().unwrap();
        assert!(model.num_regions() > 3);
        assert_eq!(model.total_count(), 49);
        let total: f64 = model.probabilities().iter().sum();
        assert!((total * 98.0 - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_rows_split_cleanly() {
        let mut data = Array2::from_elem((30, 2), 1.0);
        data.row_mut(29).fill(8.0);
        // σ above the kernel maximum: every region with more than k rows splits
        let mut gif = tree(3, "rbf", &[1.0], 1.5, 5);
        gif.fit(data.view()).unwrap();
        assert_eq!(gif.model().unwrap().total_count(), 30);
    }

    #[test]
    fn test_seeded_fits_repeat() {
        let data = grid(40);
        let mut a = tree(4, "matern-d1", &[1.0, 2.0], 0.9, 99);
        let mut b = tree(4, "matern-d1", &[1.0, 2.0], 0.9, 99);
        a.fit(data.view()).unwrap();
        b.fit(data.view()).unwrap();
        a.fit(data.view()).unwrap();

        let (ma, mb) = (a.model().unwrap(), b.model().unwrap());
        assert_eq!(ma.leaves(), mb.leaves());
        assert_eq!(ma.counts(), mb.counts());
        assert_eq!(a.predict(data.view()).unwrap(), b.predict(data.view()).unwrap());
    }

    #[test]
    fn test_predict_before_fit() {
        let gif = tree(2, "rbf", &[1.0], 0.5, 1);
        let err = gif.predict(grid(4).view()).err().unwrap();
        assert_eq!(err, GenifError::NotFitted);
    }

    #[test]
    fn test_predict_column_mismatch() {
        let mut gif = tree(2, "rbf", &[1.0], 0.5, 1);
        gif.fit(grid(10).view()).unwrap();
        let err = gif.predict(Array2::zeros((3, 4)).view()).err().unwrap();
        assert_eq!(err, GenifError::FeatureMismatch { expected: 2, found: 4 });
    }

    #[test]
    fn test_copy_is_unfitted() {
        let mut gif = tree(2, "rbf", &[1.0], 0.5, 3);
        gif.fit(grid(10).view()).unwrap();

        let copy = gif.copy();
        assert!(copy.model().is_none());
        assert_eq!(copy.config(), gif.config());
        assert_eq!(gif.copy_for_member(4).config().seed, Some(7));
        assert!(gif.into_model().is_some());
    }

    #[test]
    fn test_refit_replaces_model() {
        let mut gif = tree(2, "rbf", &[1.0], 0.5, 3);
        gif.fit(grid(10).view()).unwrap();
        gif.fit(grid(21).view()).unwrap();
        assert_eq!(gif.model().unwrap().total_count(), 21);
    }

    proptest! {
        #[test]
        fn children_partition_parent(
            (rows, values) in (6usize..40).prop_flat_map(|n| (Just(n), prop::collection::vec(-10.0f64..10.0, n * 2))),
            k in 2usize..5,
            seed in any::<u64>(),
        ) {
            let data = Array2::from_shape_vec((rows, 2), values).unwrap();
            let gif = tree(k, "rbf", &[1.0], 0.99, seed);
            let partition = gif.induce(data.view()).unwrap();

            for (_, node) in partition.iter() {
                prop_assert!(node.indices.contains(&node.representative));
                if node.is_leaf() {
                    continue;
                }
                prop_assert_eq!(node.children.len(), k);
                let mut covered: Vec<usize> = node
                    .children
                    .iter()
                    .flat_map(|&c| partition.node(c).indices.iter().copied())
                    .collect();
                covered.sort_unstable();
                let mut expected = node.indices.clone();
                expected.sort_unstable();
                prop_assert_eq!(covered, expected);
            }

            let leaf_rows: usize = partition.leaves().iter().map(|&id| partition.node(id).len()).sum();
            prop_assert_eq!(leaf_rows, rows);
        }
    }
}
