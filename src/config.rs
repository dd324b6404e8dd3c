//! Instrument settings shared by the voice bank and the render engine.
//!
//! The pitch layout (base note, semitone ratio, octave count) is fixed by the
//! controller's key layout and lives in crate-level constants. Everything here
//! is timbre and feel, and can be changed without touching the decoder.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::oscillator::Waveform, DEFAULT_OCTAVE, MAX_OCTAVE};

/// ADSR timings in seconds, sustain as a level in [0, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.3,
            sustain: 0.8,
            release: 0.05,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    pub envelope: EnvelopeConfig,
    pub waveform: Waveform,
    /// Time constant of the per-note volume smoother, in seconds.
    pub volume_smoothing: f32,
    /// Gain applied to the summed bank before output.
    pub master_gain: f32,
    /// Cutoff of the optional low-pass on the mix, in Hz.
    pub tone_cutoff: Option<f32>,
    /// Octave selected before the first decoded packet.
    pub start_octave: usize,
}

impl InstrumentConfig {
    /// Start octave clamped to the range the decoder can reach.
    pub fn start_octave(&self) -> usize {
        self.start_octave.min(MAX_OCTAVE)
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            envelope: EnvelopeConfig::default(),
            waveform: Waveform::Triangle,
            volume_smoothing: 0.05,
            master_gain: 0.25,
            tone_cutoff: None,
            start_octave: DEFAULT_OCTAVE,
        }
    }
}
