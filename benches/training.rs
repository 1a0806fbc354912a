use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use win_predictor::{build_pipeline, TrainingConfig};

const N_FEATURES: usize = 8;

fn create_match_data(n_rows: usize) -> (Array2<f64>, Array1<f64>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, N_FEATURES), |_| rng.gen::<f64>() * 20.0);
    let y = x
        .rows()
        .into_iter()
        .map(|row| if row[0] - row[1] + rng.gen::<f64>() * 4.0 > 2.0 { 1.0 } else { 0.0 })
        .collect::<Array1<f64>>();
    let names = (0..N_FEATURES).map(|i| format!("feature_{}", i)).collect();
    (x, y, names)
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for n_rows in [1000, 5000, 10000].iter() {
        let (x, y, names) = create_match_data(*n_rows);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut pipeline = build_pipeline(&TrainingConfig::default());
                pipeline.fit(black_box(x), black_box(y), &names).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let (x, y, names) = create_match_data(5000);
    let mut pipeline = build_pipeline(&TrainingConfig::default());
    pipeline.fit(&x, &y, &names).unwrap();

    for n_rows in [1, 100, 1000].iter() {
        let (batch, _, _) = create_match_data(*n_rows);
        group.bench_with_input(BenchmarkId::new("predict_proba", n_rows), &batch, |b, batch| {
            b.iter(|| pipeline.predict_proba(black_box(batch)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
