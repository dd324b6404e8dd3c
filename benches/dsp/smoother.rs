//! Benchmarks for the volume smoother, including the atomic read per sample.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rbkeys::dsp::{ParamSmoother, SharedParam};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_smoother(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smoother");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let target = SharedParam::new(0.0);
        let mut smoother = ParamSmoother::new(target.clone(), 0.05, SAMPLE_RATE);

        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("moving_target", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                target.set(if flip { 1.0 } else { 0.25 });
                for sample in buffer.iter_mut() {
                    *sample = smoother.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
