//! Whole-instrument benchmarks: a full voice bank under load and the
//! controller decode path.

mod bank;
mod decoder;

pub use bank::bench_bank;
pub use decoder::bench_decoder;
