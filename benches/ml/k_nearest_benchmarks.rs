use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knn_euclid::{knn_euclidean_with_config, squared_norms, KnnConfig};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_set(rng: &mut ChaCha8Rng, rows: usize, dim: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, dim), |_| rng.gen_range(-1.0..1.0))
}

fn bench_knn_euclidean(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_euclidean");
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let dim = 32;
    let queries = random_set(&mut rng, 256, dim);

    for &n_train in &[1_000, 10_000] {
        let train = random_set(&mut rng, n_train, dim);
        let labels: Vec<i32> = (0..n_train).map(|_| rng.gen_range(0..10)).collect();
        let sq = squared_norms(train.view());

        for parallel in [false, true] {
            let config = KnnConfig::new(15).with_parallel(parallel);
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(name, n_train), &n_train, |b, _| {
                b.iter(|| {
                    knn_euclidean_with_config(
                        black_box(train.view()),
                        black_box(sq.view()),
                        black_box(&labels),
                        black_box(queries.view()),
                        &config,
                    )
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_knn_euclidean);
criterion_main!(benches);
