//! Control values handed from the poll thread to the audio thread.
//!
//! The writer publishes a target with a single relaxed atomic store; the
//! audio thread chases it with a one-pole low-pass so a new target becomes a
//! short glide instead of a step (no zipper noise). A reader that races a
//! store sees either the old or the new target, and either one is smoothed.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

/// An `f32` shared between threads without locking.
#[derive(Debug, Clone)]
pub struct SharedParam {
    bits: Arc<AtomicU32>,
}

impl SharedParam {
    pub fn new(value: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// One-pole smoother following a [`SharedParam`].
///
/// `current += (target - current) * coeff` per sample, where `coeff` gives
/// a time constant of `time` seconds (63% of the way after `time`).
#[derive(Debug)]
pub struct ParamSmoother {
    target: SharedParam,
    current: f32,
    coeff: f32,
}

impl ParamSmoother {
    pub fn new(target: SharedParam, time: f32, sample_rate: f32) -> Self {
        let current = target.get();
        Self {
            target,
            current,
            coeff: smoothing_coeff(time, sample_rate),
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let target = self.target.get();
        self.current += (target - self.current) * self.coeff;
        self.current
    }

    pub fn value(&self) -> f32 {
        self.current
    }
}

/// Per-sample coefficient for a one-pole smoother with time constant `time`.
pub fn smoothing_coeff(time: f32, sample_rate: f32) -> f32 {
    if time <= 0.0 || sample_rate <= 0.0 {
        return 1.0;
    }
    1.0 - (-1.0 / (time * sample_rate)).exp()
}
