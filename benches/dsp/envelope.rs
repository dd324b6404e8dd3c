//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rbkeys::dsp::Envelope;
use rbkeys::graph::node::RenderCtx;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut env = Envelope::adsr(0.5, 0.3, 0.8, 0.05);
        env.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(&ctx)))
        });

        let mut env = Envelope::adsr(0.001, 0.001, 0.8, 0.05);
        env.note_on(&ctx);
        for _ in 0..200 {
            env.next_sample(&ctx);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // Retrigger every block: attack restarts from wherever release got to.
        let mut env = Envelope::adsr(0.01, 0.3, 0.8, 0.05);
        group.bench_with_input(BenchmarkId::new("retrigger", size), &size, |b, _| {
            b.iter(|| {
                env.note_on(&ctx);
                env.render(black_box(&mut buffer[..size / 2]), &ctx);
                env.note_off(&ctx);
                env.render(black_box(&mut buffer[size / 2..]), &ctx);
            })
        });
    }

    group.finish();
}
