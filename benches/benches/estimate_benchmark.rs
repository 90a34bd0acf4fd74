//! Transfer estimation benchmarks.
//!
//! Run with: `cargo bench --package netgauge-bench --bench estimate_benchmark`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use netgauge_bench::{sample_configs, sample_files};
use netgauge_lib::{TransferEstimator, convert_from_bytes, simulate_bandwidth};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn estimate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");

    for count in [1usize, 100, 10_000] {
        let files = sample_files(count);
        group.throughput(Throughput::Elements(count as u64));

        for (name, config) in sample_configs() {
            let estimator = TransferEstimator::new(config);
            group.bench_with_input(
                BenchmarkId::new(name, count),
                &files,
                |b, files| b.iter(|| estimator.estimate(black_box(files))),
            );
        }
    }

    group.finish();
}

fn units_benchmark(c: &mut Criterion) {
    let sizes: Vec<f64> = (0..1_000).map(|i| 1.7_f64.powi(i % 60)).collect();

    c.bench_function("convert_from_bytes/1000", |b| {
        b.iter(|| {
            for &bytes in &sizes {
                black_box(convert_from_bytes(black_box(bytes)));
            }
        });
    });
}

fn simulator_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("simulate_bandwidth", |b| {
        b.iter(|| simulate_bandwidth(black_box(100.0), black_box(20.0), &mut rng));
    });
}

criterion_group!(benches, estimate_benchmark, units_benchmark, simulator_benchmark);
criterion_main!(benches);
