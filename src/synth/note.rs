use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

use crate::{
    config::InstrumentConfig,
    dsp::{
        envelope::Envelope,
        oscillator::OscillatorBlock,
        smoother::{ParamSmoother, SharedParam},
    },
    graph::node::{GraphNode, RenderCtx},
    synth::message::{Trigger, TRIGGER_QUEUE_SIZE},
};

/// Render half of a note: lives on the audio thread.
///
/// Output is `envelope × smoothed volume × waveform(frequency)`. The envelope
/// only moves when a [`Trigger`] arrives from the paired [`NoteHandle`].
pub struct Note {
    frequency: f32,
    osc: OscillatorBlock,
    env: Envelope,
    volume: ParamSmoother,
    triggers: Consumer<Trigger>,
}

/// Control half of a note: lives on the input-poll thread.
pub struct NoteHandle {
    frequency: f32,
    enabled: bool,
    volume: SharedParam,
    triggers: Producer<Trigger>,
}

impl Note {
    /// Build both halves of a note. `sample_rate` must be the stream's rate;
    /// it fixes the smoothing coefficient.
    pub fn new(frequency: f32, sample_rate: f32, config: &InstrumentConfig) -> (Self, NoteHandle) {
        let (tx, rx) = RingBuffer::<Trigger>::new(TRIGGER_QUEUE_SIZE);
        let volume = SharedParam::new(1.0);

        let note = Self {
            frequency,
            osc: OscillatorBlock::new(config.waveform),
            env: Envelope::from_config(&config.envelope),
            volume: ParamSmoother::new(volume.clone(), config.volume_smoothing, sample_rate),
            triggers: rx,
        };
        let handle = NoteHandle {
            frequency,
            enabled: false,
            volume,
            triggers: tx,
        };

        (note, handle)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// Triggers sent by the handle that have not been rendered yet.
    pub fn pending_triggers(&self) -> usize {
        self.triggers.slots()
    }

    fn apply_triggers(&mut self, ctx: &RenderCtx) {
        while let Ok(trigger) = self.triggers.pop() {
            match trigger {
                Trigger::Attack => self.env.note_on(ctx),
                Trigger::Release => self.env.note_off(ctx),
            }
        }
    }

    /// One sample at `ctx`, which must already carry this note's frequency.
    /// Pending triggers are applied per block, not here.
    #[inline]
    fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let env = self.env.next_sample(ctx);
        let volume = self.volume.next_sample();
        env * volume * self.osc.next_sample(ctx)
    }
}

impl GraphNode for Note {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let ctx = RenderCtx {
            frequency: self.frequency,
            ..*ctx
        };
        self.apply_triggers(&ctx);

        if !self.env.is_active() {
            // Silent, but keep the volume glide moving so a later attack
            // starts from the current target.
            for sample in out.iter_mut() {
                self.volume.next_sample();
                *sample = 0.0;
            }
            return;
        }

        for sample in out.iter_mut() {
            *sample = self.next_sample(&ctx);
        }
    }

    fn is_active(&self) -> bool {
        self.env.is_active() || self.triggers.slots() > 0
    }
}

impl NoteHandle {
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last volume target published to the audio thread.
    pub fn volume(&self) -> f32 {
        self.volume.get()
    }

    /// Start the note. Re-enabling a sounding note does nothing.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        match self.triggers.push(Trigger::Attack) {
            Ok(()) => self.enabled = true,
            Err(_) => warn!(frequency = self.frequency, "trigger queue full, note on dropped"),
        }
    }

    /// Release the note. Disabling a silent note does nothing.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        match self.triggers.push(Trigger::Release) {
            Ok(()) => self.enabled = false,
            Err(_) => warn!(frequency = self.frequency, "trigger queue full, note off dropped"),
        }
    }

    /// Set the target volume, clamped to [0, 1]. The audio thread glides to it.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume.set(volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::EnvelopeStage;

    const SAMPLE_RATE: f32 = 8_000.0;

    fn note() -> (Note, NoteHandle) {
        Note::new(220.0, SAMPLE_RATE, &InstrumentConfig::default())
    }

    fn render(note: &mut Note, frames: usize) -> Vec<f32> {
        let mut buffer = vec![0.0f32; frames];
        note.render_block(&mut buffer, &RenderCtx::new(SAMPLE_RATE));
        buffer
    }

    #[test]
    fn enable_twice_triggers_once() {
        let (note, mut handle) = note();
        handle.enable();
        handle.enable();

        assert!(handle.is_enabled());
        assert_eq!(note.pending_triggers(), 1);
    }

    #[test]
    fn disable_on_fresh_note_is_noop() {
        let (mut note, mut handle) = note();
        handle.disable();

        assert_eq!(note.pending_triggers(), 0);
        assert!(render(&mut note, 256).iter().all(|&s| s == 0.0));
        assert_eq!(note.envelope().stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn reenable_does_not_restart_attack() {
        let (mut note, mut handle) = note();
        handle.enable();
        // attack (80) + decay (2400) samples at 8 kHz
        render(&mut note, 2_600);
        assert_eq!(note.envelope().stage(), EnvelopeStage::Sustain);

        handle.enable();
        render(&mut note, 16);
        assert_eq!(note.envelope().stage(), EnvelopeStage::Sustain);
    }

    #[test]
    fn enabled_note_sounds_and_release_decays_to_silence() {
        let (mut note, mut handle) = note();
        handle.enable();
        let on = render(&mut note, 1_024);
        assert!(on.iter().any(|s| s.abs() > 0.1));

        handle.disable();
        // release is 50 ms = 400 samples
        render(&mut note, 400);
        assert!(!note.is_active());
        assert!(render(&mut note, 256).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn volume_is_clamped() {
        let (_note, mut handle) = note();
        handle.set_volume(3.0);
        assert_eq!(handle.volume(), 1.0);
        handle.set_volume(-1.0);
        assert_eq!(handle.volume(), 0.0);
        handle.set_volume(f32::NAN);
        assert_eq!(handle.volume(), 0.0);
    }

    #[test]
    fn volume_change_is_smoothed() {
        let (mut note, mut handle) = note();
        handle.enable();
        render(&mut note, 2_600);
        let before = note.volume.value();

        handle.set_volume(0.0);
        render(&mut note, 1);
        let after = note.volume.value();
        assert!(after < before && after > 0.9 * before, "stepped to {after}");
    }

    #[test]
    fn renders_own_pitch_whatever_the_caller_frequency() {
        let (mut note, mut handle) = note();
        handle.enable();
        // RenderCtx::new carries 0 Hz; the note must still play 220 Hz.
        let out = render(&mut note, 2_000);

        let crossings = out
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count();
        // 220 Hz over 0.25 s is 55 cycles, two crossings each.
        assert!((100..=120).contains(&crossings), "{crossings} crossings");
        let mean = out.iter().sum::<f32>() / out.len() as f32;
        assert!(mean.abs() < 0.05, "dc offset {mean}");
    }

    #[test]
    fn gate_only_moves_through_the_handle() {
        let (mut note, mut handle) = note();
        let ctx = RenderCtx::new(SAMPLE_RATE);

        // The graph-level gate hooks are no-ops on a note.
        note.note_on(&ctx);
        assert!(render(&mut note, 256).iter().all(|&s| s == 0.0));

        handle.enable();
        render(&mut note, 256);
        note.note_off(&ctx);
        assert!(note.envelope().is_active());

        handle.disable();
        render(&mut note, 400);
        assert!(!note.is_active());
        assert!(render(&mut note, 256).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn frequency_is_fixed() {
        let (note, handle) = note();
        assert_eq!(note.frequency(), 220.0);
        assert_eq!(handle.frequency(), 220.0);
    }
}
