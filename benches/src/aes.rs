//! AES block cipher benchmarks.
use aes::{Aes, Block};
use criterion::{BenchmarkId, Throughput, criterion_group, criterion_main};

mod utils;
use utils::{Benchmarker, config};

fn bench(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("aes");

    for key_len in [16, 24, 32] {
        let aes = Aes::new(&vec![0x42; key_len]).unwrap();
        let mut blocks: [Block; 8] = Default::default();

        group.throughput(Throughput::Bytes((blocks.len() * blocks[0].len()) as u64));

        group.bench_function(BenchmarkId::new("encrypt_blocks", key_len * 8), |b| {
            b.iter(|| aes.encrypt_blocks(&mut blocks));
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
