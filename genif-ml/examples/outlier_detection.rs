//! Outlier Detection Example
//!
//! Fits a Generalized Isolation Forest on two sensor operating points and
//! scores a handful of new readings against it.
//!
//! ## Scenario
//!
//! A machine runs in two modes: idle (about 20 °C, 0.5 bar) and load (about
//! 60 °C, 3 bar). Readings between or far outside the two modes should get the
//! lowest scores.

use genif_ml::{ForestConfig, GeneralizedIsolationForest, GenifResult, Learner};
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Normalised readings: temperature / 10, pressure
fn history(rows: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(2024);
    Array2::from_shape_fn((rows, 2), |(i, j)| {
        let (temperature, pressure) = if i % 3 == 0 { (6.0, 3.0) } else { (2.0, 0.5) };
        let centre = if j == 0 { temperature } else { pressure };
        centre + rng.gen_range(-0.3..0.3)
    })
}

fn main() -> GenifResult<()> {
    println!("=== Generalized Isolation Forest: Outlier Detection ===\n");

    let config = ForestConfig::new(6, 50, 256, "rbf", vec![1.0], 0.8).with_seed(42);
    println!("Configuration: {}", config.to_json()?);

    let mut forest = GeneralizedIsolationForest::new(config)?;
    let training = history(1_000);
    forest.fit(training.view())?;

    let stats = forest.stats();
    println!(
        "\nFitted {} trees, {} regions total, largest tree {} regions\n",
        stats.num_trees, stats.total_regions, stats.max_regions
    );

    let readings = array![
        [2.0, 0.5],  // idle
        [6.1, 2.9],  // under load
        [4.0, 1.7],  // between modes
        [2.1, 3.0],  // cold but pressurised
        [12.0, 8.0], // far out
    ];
    let labels = ["idle", "load", "between", "cold+pressure", "far out"];

    let scores = forest.predict(readings.view())?;
    let reference = forest.predict(training.view())?;
    let threshold = reference.iter().copied().fold(f64::INFINITY, f64::min);

    println!("{:<15} {:>10}  {}", "reading", "score", "verdict");
    for (label, score) in labels.iter().zip(scores.iter()) {
        let verdict = if *score < threshold { "🚨 outlier" } else { "ok" };
        println!("{:<15} {:>10.5}  {}", label, score, verdict);
    }

    println!("\nLowest training score: {:.5}", threshold);
    Ok(())
}
