//! AES-GCM benchmarks.
use aes_gcm::AesGcm;
use criterion::{BenchmarkId, Throughput, criterion_group, criterion_main};

mod utils;
use utils::{Benchmarker, SIZES, config};

const NONCE: [u8; 12] = [0x24; 12];

fn bench(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("aes-gcm");

    for key_len in [16, 32] {
        let cipher = AesGcm::new(&vec![0x42; key_len]).unwrap();

        for size in &SIZES {
            let mut buf = vec![0u8; *size];

            group.throughput(Throughput::Bytes(*size as u64));

            let id = format!("{}/{size}", key_len * 8);
            group.bench_function(BenchmarkId::new("encrypt", &id), |b| {
                b.iter(|| cipher.encrypt_in_place_detached(&NONCE, &[], &mut buf).unwrap());
            });

            let tag = cipher
                .encrypt_in_place_detached(&NONCE, &[], &mut buf)
                .unwrap();
            group.bench_function(BenchmarkId::new("decrypt", &id), |b| {
                b.iter(|| {
                    let mut ciphertext = buf.clone();
                    cipher
                        .decrypt_in_place_detached(&NONCE, &[], &mut ciphertext, &tag)
                        .unwrap();
                });
            });
        }
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = config();
    targets = bench
);

criterion_main!(benches);
