//! GHASH benchmarks.
use criterion::{BenchmarkId, Throughput, criterion_group, criterion_main};
use ghash::{GHash, universal_hash::UniversalHash};

mod utils;
use utils::{Benchmarker, SIZES, config};

fn bench(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("ghash");

    for size in &SIZES {
        let buf = vec![0u8; *size];

        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("update_padded", size), |b| {
            let mut ghash = GHash::new(&Default::default());
            b.iter(|| ghash.update_padded(&buf));
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = config();
    targets = bench
);

criterion_main!(benches);
