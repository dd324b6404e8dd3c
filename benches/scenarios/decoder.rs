//! Benchmarks for one controller poll: decode a packet and push it into the
//! bank handles. Not on the audio thread, but it runs every few ms.

use std::hint::black_box;

use criterion::Criterion;
use rbkeys::controller::PerformanceController;
use rbkeys::input::{scripted::keys_down, DecodedPerformance, ScriptedInput};
use rbkeys::synth::VoiceBank;
use rbkeys::InstrumentConfig;

use crate::SAMPLE_RATE;

pub fn bench_decoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/decoder");

    let snapshot = keys_down(&[0, 4, 7, 12, 16, 19, 24], 0x60);
    group.bench_function("decode", |b| {
        b.iter(|| DecodedPerformance::decode(black_box(&snapshot), black_box(2)))
    });

    // Keep the bank alive so trigger queues have a consumer.
    let (_bank, handle) = VoiceBank::new(SAMPLE_RATE, &InstrumentConfig::default());
    let mut controller =
        PerformanceController::new(ScriptedInput::demo(), handle, 2);
    group.bench_function("tick", |b| {
        b.iter(|| black_box(controller.tick()))
    });

    group.finish();
}
