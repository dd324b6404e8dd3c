//! Benchmarks for the full 61-note bank as the audio callback sees it.
//!
//! Idle notes cost only their smoother; the interesting numbers are a full
//! 25-key chord and the engine's interleaved stereo output.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rbkeys::engine::Engine;
use rbkeys::graph::node::{GraphNode, RenderCtx};
use rbkeys::synth::VoiceBank;
use rbkeys::InstrumentConfig;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bank");
    let ctx = RenderCtx::new(SAMPLE_RATE);
    let config = InstrumentConfig::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let (mut idle, _idle_handle) = VoiceBank::new(SAMPLE_RATE, &config);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        let (mut triad, mut handle) = VoiceBank::new(SAMPLE_RATE, &config);
        for index in [24, 28, 31] {
            handle.note_mut(index).enable();
        }
        group.bench_with_input(BenchmarkId::new("triad", size), &size, |b, _| {
            b.iter(|| triad.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        let (mut full, mut full_handle) = VoiceBank::new(SAMPLE_RATE, &config);
        for index in 24..=48 {
            full_handle.note_mut(index).enable();
        }
        group.bench_with_input(BenchmarkId::new("all_keys", size), &size, |b, _| {
            b.iter(|| full.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        let toned = InstrumentConfig {
            tone_cutoff: Some(800.0),
            ..InstrumentConfig::default()
        };
        let (mut engine, mut engine_handle) = Engine::new(SAMPLE_RATE, &toned);
        for index in 24..=48 {
            engine_handle.note_mut(index).enable();
        }
        let mut stereo = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("engine_stereo", size), &size, |b, _| {
            b.iter(|| engine.render_interleaved(black_box(&mut stereo), 2, |s| {
                black_box(s);
            }))
        });
    }

    group.finish();
}
