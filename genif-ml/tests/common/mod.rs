//! Common test utilities and data generators for integration tests
//!
//! - Seeded Gaussian cluster generators
//! - The two-cluster-plus-outliers scenario used across tests
//! - Score summary helpers

#![allow(dead_code)]

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Far-away points appended after the inlier clusters
pub const OUTLIERS: [[f64; 2]; 5] = [[40.0, -40.0], [-40.0, 40.0], [50.0, 50.0], [-45.0, -45.0], [30.0, -60.0]];

/// Inlier rows in [`clusters_with_outliers`]
pub const INLIERS: usize = 95;

/// Seeded generator of normally distributed points
pub struct GaussianGenerator {
    rng: StdRng,
}

impl GaussianGenerator {
    /// Create generator with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One standard normal draw (Box-Muller)
    pub fn standard_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// `rows` points around `centre` with per-axis standard deviation `std`
    pub fn cluster(&mut self, centre: &[f64], std: f64, rows: usize) -> Array2<f64> {
        let mut points = Array2::zeros((rows, centre.len()));
        for mut row in points.rows_mut() {
            for (value, &c) in row.iter_mut().zip(centre) {
                *value = c + std * self.standard_normal();
            }
        }
        points
    }
}

/// 48 points around (0, 0), 47 around (10, 10), std 0.5, then [`OUTLIERS`]
pub fn clusters_with_outliers(seed: u64) -> Array2<f64> {
    let mut generator = GaussianGenerator::new(seed);
    let first = generator.cluster(&[0.0, 0.0], 0.5, 48);
    let second = generator.cluster(&[10.0, 10.0], 0.5, 47);

    let mut data = Array2::zeros((INLIERS + OUTLIERS.len(), 2));
    data.slice_mut(ndarray::s![..48, ..]).assign(&first);
    data.slice_mut(ndarray::s![48..INLIERS, ..]).assign(&second);
    for (i, outlier) in OUTLIERS.iter().enumerate() {
        data[[INLIERS + i, 0]] = outlier[0];
        data[[INLIERS + i, 1]] = outlier[1];
    }
    data
}

/// Mean of a score slice
pub fn mean(scores: ArrayView1<'_, f64>) -> f64 {
    scores.sum() / scores.len() as f64
}
