//! Result map contention benchmarks.
//!
//! Run with: `cargo bench --package netgauge-bench --bench results_benchmark`

use criterion::{Criterion, criterion_group, criterion_main};
use netgauge_lib::{ProbeKey, ProbeResults};

fn scan_batch_benchmark(c: &mut Criterion) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Skipping results benchmark: {e}");
            return;
        }
    };

    c.bench_function("results/concurrent_scan_writes", |b| {
        b.to_async(&runtime).iter(|| async {
            let results = ProbeResults::new();
            let writers = ProbeKey::scans().iter().map(|&key| {
                let results = results.clone();
                tokio::spawn(async move { results.set(key, "clean").await })
            });
            for writer in writers.collect::<Vec<_>>() {
                let _ = writer.await;
            }
            results.snapshot().await
        });
    });
}

criterion_group!(benches, scan_batch_benchmark);
criterion_main!(benches);
