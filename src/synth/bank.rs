use crate::{
    config::InstrumentConfig,
    graph::node::{GraphNode, RenderCtx},
    synth::note::{Note, NoteHandle},
    BASE_NOTE, MAX_BLOCK_SIZE, NOTE_RATIO, TOTAL_NOTES,
};

/// Frequency of pitch index `index`: `BASE_NOTE * NOTE_RATIO^index`.
pub fn frequency_for(index: usize) -> f32 {
    BASE_NOTE * NOTE_RATIO.powi(index as i32)
}

/// Every playable pitch, created once at startup.
///
/// The bank is the render half; [`BankHandle`] is the matching control half.
/// Both are fixed at [`TOTAL_NOTES`] entries and are never resized. The
/// output is the sum of every note, idle notes contributing silence.
pub struct VoiceBank {
    notes: Vec<Note>,
    temp_buffer: Vec<f32>,
}

/// Control half of the bank, indexed the same way as [`VoiceBank`].
pub struct BankHandle {
    notes: Vec<NoteHandle>,
}

impl VoiceBank {
    pub fn new(sample_rate: f32, config: &InstrumentConfig) -> (Self, BankHandle) {
        let (notes, handles): (Vec<Note>, Vec<NoteHandle>) = (0..TOTAL_NOTES)
            .map(|index| Note::new(frequency_for(index), sample_rate, config))
            .unzip();

        let bank = Self {
            notes,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        };
        (bank, BankHandle { notes: handles })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, index: usize) -> &Note {
        &self.notes[index]
    }

    pub fn note_mut(&mut self, index: usize) -> &mut Note {
        &mut self.notes[index]
    }

    /// Number of notes whose envelope is still running.
    pub fn active_notes(&self) -> usize {
        self.notes.iter().filter(|note| note.is_active()).count()
    }
}

impl GraphNode for VoiceBank {
    /// Sum of every note. `out` must be at most [`MAX_BLOCK_SIZE`] long.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let frames = &mut self.temp_buffer[..out.len()];

        for note in &mut self.notes {
            note.render_block(frames, ctx);
            for (o, v) in out.iter_mut().zip(frames.iter()) {
                *o += v;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.notes.iter().any(|note| note.is_active())
    }
}

impl BankHandle {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, index: usize) -> &NoteHandle {
        &self.notes[index]
    }

    pub fn note_mut(&mut self, index: usize) -> &mut NoteHandle {
        &mut self.notes[index]
    }

    pub fn frequency(&self, index: usize) -> f32 {
        self.notes[index].frequency()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NoteHandle> {
        self.notes.iter_mut()
    }

    /// Release every sounding note.
    pub fn release_all(&mut self) {
        for note in &mut self.notes {
            note.disable();
        }
    }

    /// Indices of notes currently switched on.
    pub fn enabled_notes(&self) -> impl Iterator<Item = usize> + '_ {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.is_enabled())
            .map(|(index, _)| index)
    }
}
