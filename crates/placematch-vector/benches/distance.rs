//! Benchmarks for the metric library and exhaustive matching.
//!
//! Run with: `cargo bench -p placematch-vector`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use placematch_storage::backends::RedbEngine;
use placematch_vector::{Descriptor, DescriptorStore, DistanceMetric, MatchingEngine};
use rand::Rng;

/// Generate a random vector of the specified dimension.
fn random_vector(dim: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Benchmark every metric across descriptor dimensions.
fn bench_metrics(c: &mut Criterion) {
    let metrics = [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
        DistanceMetric::Minkowski { p: 3.0 },
        DistanceMetric::BrayCurtis,
        DistanceMetric::Cosine,
    ];

    for metric in metrics {
        let mut group = c.benchmark_group(metric.name());

        // NetVLAD-style descriptor sizes
        for dim in [128, 512, 4096] {
            let a = random_vector(dim);
            let b = random_vector(dim);

            group.throughput(Throughput::Elements(dim as u64));
            group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
                bench.iter(|| metric.calculate(black_box(&a), black_box(&b)));
            });
        }

        group.finish();
    }
}

/// Benchmark a full-store scan for both matching operations.
fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    let dim = 512;

    for records in [100, 1000] {
        let store = DescriptorStore::new(RedbEngine::in_memory().unwrap());
        {
            let writer = store.writer().unwrap();
            for i in 0..records {
                let label = format!("class_{}", i % 10);
                writer.append(&label, &Descriptor::new(random_vector(dim)).unwrap()).unwrap();
            }
        }
        let engine = MatchingEngine::new(&store, DistanceMetric::Euclidean);
        let query = random_vector(dim);

        group.throughput(Throughput::Elements(records as u64));
        group.bench_with_input(BenchmarkId::new("single_best", records), &records, |bench, _| {
            bench.iter(|| engine.single_best_match(black_box(&query)));
        });
        group.bench_with_input(BenchmarkId::new("top_5_vote", records), &records, |bench, _| {
            bench.iter(|| engine.top_n_vote(black_box(&query), 5));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_metrics, bench_matching);
criterion_main!(benches);
