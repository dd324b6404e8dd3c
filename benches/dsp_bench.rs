//! Benchmarks for the synth's render path.
//!
//! Run with: cargo bench
//!
//! Everything here runs inside the audio callback, so it has to finish well
//! within the buffer deadline. At 48kHz:
//!   - 64 samples  = 1.33ms
//!   - 256 samples = 5.33ms
//!   - 512 samples = 10.67ms
//!
//! Benchmark groups:
//!   - dsp/*        Per-note building blocks (oscillator, envelope, smoother, tone filter)
//!   - scenarios/*  Whole voice bank and the input decoder

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_envelope,
    dsp::bench_smoother,
    dsp::bench_filter,
    scenarios::bench_bank,
    scenarios::bench_decoder,
);
criterion_main!(benches);
