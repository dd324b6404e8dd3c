use std::f32::consts::PI;

use crate::graph::node::{GraphNode, RenderCtx};

/*
Tone control: a 12 dB/oct state-variable low-pass (trapezoidal integration)
run over the summed bank. Softens the triangle's upper harmonics.

    g  = tan(π · cutoff / sample_rate)
    k  = 2                                   (no resonance, Q = 0.5)
    h  = 1 / (1 + g · (g + k))

    v3 = x − ic2
    v1 = h · (ic1 + g · v3)                  band-pass
    v2 = ic2 + g · v1                        low-pass
    ic1 ← 2·v1 − ic1
    ic2 ← 2·v2 − ic2
*/

/// `k` in the equations above.
const DAMPING: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct ToneFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
}

impl ToneFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
        }
    }

    #[inline]
    fn compute_g(&self, ctx: &RenderCtx) -> f32 {
        // Keep the prewarped cutoff below Nyquist or tan() blows up.
        let cutoff = self.cutoff_hz.clamp(10.0, ctx.sample_rate * 0.49);
        (PI * cutoff / ctx.sample_rate).tan()
    }

    #[inline]
    fn next_sample(&mut self, sample: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + DAMPING));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }
}

impl GraphNode for ToneFilter {
    /// Filters `out` in place.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx);
        for sample in out.iter_mut() {
            *sample = self.next_sample(*sample, g);
        }
    }
}
