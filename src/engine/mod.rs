//! Audio-callback side of the instrument.
//!
//! [`Engine`] owns the render half of the voice bank plus the output stage
//! (optional tone filter, master gain, channel fan-out). It is built before
//! the stream starts and then moved into the callback. Nothing here locks,
//! allocates or logs.

use crate::{
    config::InstrumentConfig,
    dsp::filter::ToneFilter,
    graph::node::{GraphNode, RenderCtx},
    synth::bank::{BankHandle, VoiceBank},
    MAX_BLOCK_SIZE,
};

pub struct Engine {
    ctx: RenderCtx,
    bank: VoiceBank,
    tone: Option<ToneFilter>,
    master_gain: f32,
    mix_buffer: Vec<f32>,
}

impl Engine {
    /// Build the engine for a stream running at `sample_rate`, returning the
    /// handle the poll thread uses to play notes.
    pub fn new(sample_rate: f32, config: &InstrumentConfig) -> (Self, BankHandle) {
        let (bank, handle) = VoiceBank::new(sample_rate, config);
        let engine = Self {
            ctx: RenderCtx::new(sample_rate),
            bank,
            tone: config.tone_cutoff.map(ToneFilter::lowpass),
            master_gain: config.master_gain.max(0.0),
            mix_buffer: vec![0.0; MAX_BLOCK_SIZE],
        };
        (engine, handle)
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }

    /// Render mono output into `out`, any length. Not clamped: a dense chord
    /// can exceed full scale.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.bank.render_block(chunk, &self.ctx);
            if let Some(tone) = self.tone.as_mut() {
                tone.render_block(chunk, &self.ctx);
            }
            for sample in chunk.iter_mut() {
                *sample *= self.master_gain;
            }
        }
    }

    /// Fill an interleaved output buffer: `data.len() / channels` frames, the
    /// mono signal copied to every channel and clamped to [-1, 1].
    ///
    /// `on_frame` sees each mono sample after clamping (used to feed the
    /// oscilloscope).
    pub fn render_interleaved(
        &mut self,
        data: &mut [f32],
        channels: usize,
        mut on_frame: impl FnMut(f32),
    ) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

            let mut block = std::mem::take(&mut self.mix_buffer);
            self.render_block(&mut block[..frames_to_render]);

            let out_off = frames_written * channels;
            for (i, &s) in block[..frames_to_render].iter().enumerate() {
                let s = s.clamp(-1.0, 1.0);
                on_frame(s);
                let frame = out_off + i * channels;
                data[frame..frame + channels].fill(s);
            }
            self.mix_buffer = block;

            frames_written += frames_to_render;
        }

        // Trailing partial frame, if the backend ever hands us one.
        data[total_frames * channels..].fill(0.0);
    }
}
