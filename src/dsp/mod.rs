//! Low-level DSP primitives used by the notes and the render engine.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable low-pass used as the tone control.
pub mod filter;
/// Oscillator waveforms.
pub mod oscillator;
/// Atomic control values and their audio-rate smoothing.
pub mod smoother;

pub use envelope::{Envelope, EnvelopeStage};
pub use oscillator::{OscillatorBlock, Waveform};
pub use smoother::{ParamSmoother, SharedParam};
