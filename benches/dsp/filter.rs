//! Benchmarks for the optional output tone filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rbkeys::dsp::filter::ToneFilter;
use rbkeys::graph::node::{GraphNode, RenderCtx};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        // Filter runs in place, so feed it a fixed saw-ish ramp each time.
        let input: Vec<f32> = (0..size).map(|i| (i % 64) as f32 / 32.0 - 1.0).collect();
        let mut buffer = input.clone();
        let mut tone = ToneFilter::lowpass(800.0);

        group.bench_with_input(BenchmarkId::new("lowpass_800", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                tone.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
