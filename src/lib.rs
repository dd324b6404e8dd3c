pub mod config;
pub mod controller; // Poll tick: decode input, drive the voice bank
pub mod dsp;
pub mod engine; // Render side: bank + tone + output fan-out
pub mod error;
pub mod graph;
pub mod input; // Controller snapshots, backends and the bit-packed decoder
pub mod synth; // Notes and the fixed voice bank

pub use config::{EnvelopeConfig, InstrumentConfig};
pub use error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Frequency of pitch index 0 (C2).
pub const BASE_NOTE: f32 = 65.41;
/// Frequency ratio between adjacent semitones.
pub const NOTE_RATIO: f32 = 1.059_463_094_359;
pub const NUM_OCTAVES: usize = 5;
pub const NOTES_PER_OCTAVE: usize = 12;
/// Number of pitches owned by the voice bank.
pub const TOTAL_NOTES: usize = NUM_OCTAVES * NOTES_PER_OCTAVE + 1;
/// Number of keys on the controller: two octaves, inclusive.
pub const WINDOW_NOTES: usize = NOTES_PER_OCTAVE * 2 + 1;
pub const MAX_OCTAVE: usize = NUM_OCTAVES - 1;
pub const DEFAULT_OCTAVE: usize = 2;
