//! Benchmarks for forest fitting and scoring.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use genif_ml::{ForestConfig, GeneralizedIsolationForest, Learner};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform noise around four centres
fn dataset(rows: usize, columns: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(1234);
    Array2::from_shape_fn((rows, columns), |(i, _)| (i % 4) as f64 * 10.0 + rng.gen_range(-1.0..1.0))
}

fn config() -> ForestConfig {
    ForestConfig::new(8, 32, 256, "rbf", vec![1.0], 0.7).with_seed(7)
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(20);

    for columns in [2, 8, 32].iter() {
        let data = dataset(2_000, *columns);

        group.bench_with_input(BenchmarkId::from_parameter(columns), columns, |b, _| {
            let mut forest = GeneralizedIsolationForest::new(config()).unwrap();
            b.iter(|| {
                forest.fit(black_box(data.view())).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_forest_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_predict");

    for rows in [100, 1_000, 10_000].iter() {
        let train = dataset(2_000, 4);
        let queries = dataset(*rows, 4);

        let mut forest = GeneralizedIsolationForest::new(config()).unwrap();
        forest.fit(train.view()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(rows), rows, |b, _| {
            b.iter(|| forest.predict(black_box(queries.view())).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forest_fit, bench_forest_predict);
criterion_main!(benches);
