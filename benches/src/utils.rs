//! Measurement selection shared by the benchmarks.
//!
//! Wall-clock time by default; CPU cycles per byte with `--features cpb`.

use criterion::Criterion;

#[cfg(not(feature = "cpb"))]
pub type Benchmarker = Criterion;

#[cfg(feature = "cpb")]
pub type Benchmarker = Criterion<criterion_cycles_per_byte::CyclesPerByte>;

/// Message sizes in bytes: sub-block, a few batches, and bulk.
#[allow(dead_code)]
pub const SIZES: [usize; 4] = [10, 100, 1000, 16384];

pub fn config() -> Benchmarker {
    let criterion = Criterion::default();
    #[cfg(feature = "cpb")]
    let criterion = criterion.with_measurement(criterion_cycles_per_byte::CyclesPerByte);
    criterion
}
