use std::ops::RangeInclusive;

use tracing::debug;

use crate::{
    input::{buttons, ControllerSnapshot},
    MAX_OCTAVE, NOTES_PER_OCTAVE, WINDOW_NOTES,
};

/*
Keyboard Controller Bit Packing
===============================

The keyboard reports its 25 keys through the analog fields of a standard
gamepad report. Four fields are stitched into one 25-bit key mask:

    bit   24 ........ 17 16 ......... 9 8 .......... 1   0
          └ left_trigger ┘└ right_trigger ┘└ thumb_lx & 0xff ┘ thumb_lx bit 15

    mask = left_trigger << 17
         | right_trigger << 9
         | (thumb_lx & 0x00ff) << 1
         | (thumb_lx & 0x8000) >> 15

Bit 24 is the LOWEST key, bit 0 the HIGHEST. The keys cover two octaves
inclusive, placed on the voice bank at the current octave:

    window base = octave * 12
    window top  = base + 24
    key for pitch index i (base <= i <= top) = bit (24 - (i - base))

Anything outside the window is forced off; the physical keyboard cannot reach
it.

Volume lives in bits 8..=14 of the same axis and is normalised by 0x7f:

    volume = ((thumb_lx & 0x7f00) >> 8) / 127

It applies to every sounding key. The device most likely spreads separate
per-key velocities across the remaining bits; that layout is not known, so
all keys share this one value.

Octave shifting uses the d-pad: right moves the window up (stopping at
MAX_OCTAVE), left moves it down (stopping at 0). Both are applied once per
new packet.
*/

/// Bit mask of held keys. Bit 0 is the highest key of the window, bit 24
/// the lowest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteMask(u32);

impl NoteMask {
    const VALID_BITS: u32 = (1 << WINDOW_NOTES) - 1;

    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::VALID_BITS)
    }

    /// Assemble the mask from the packed hardware fields.
    pub fn from_snapshot(snapshot: &ControllerSnapshot) -> Self {
        let lx = snapshot.thumb_lx as u16 as u32;
        Self::from_bits(
            (snapshot.left_trigger as u32) << 17
                | (snapshot.right_trigger as u32) << 9
                | (lx & 0x00ff) << 1
                | (lx & 0x8000) >> 15,
        )
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, bit: usize) -> bool {
        bit < WINDOW_NOTES && self.0 & (1 << bit) != 0
    }

    /// Number of keys held.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Shared key volume, bits 8..=14 of the left stick X axis.
pub fn volume_from_snapshot(snapshot: &ControllerSnapshot) -> f32 {
    let lx = snapshot.thumb_lx as u16;
    ((lx & 0x7f00) >> 8) as f32 / 0x7f as f32
}

/// Apply the d-pad to the octave, clamping at both ends.
pub fn shift_octave(snapshot: &ControllerSnapshot, octave: usize) -> usize {
    let mut octave = octave.min(MAX_OCTAVE);
    if snapshot.is_pressed(buttons::DPAD_RIGHT) && octave < MAX_OCTAVE {
        octave += 1;
    }
    if snapshot.is_pressed(buttons::DPAD_LEFT) && octave > 0 {
        octave -= 1;
    }
    octave
}

/// Musical meaning of one controller packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedPerformance {
    pub octave: usize,
    pub volume: f32,
    pub mask: NoteMask,
}

impl DecodedPerformance {
    /// Decode a snapshot given the octave in effect before it. Pure.
    pub fn decode(snapshot: &ControllerSnapshot, previous_octave: usize) -> Self {
        Self {
            octave: shift_octave(snapshot, previous_octave),
            volume: volume_from_snapshot(snapshot),
            mask: NoteMask::from_snapshot(snapshot),
        }
    }

    /// First pitch index of the key window.
    pub fn window_base(&self) -> usize {
        self.octave * NOTES_PER_OCTAVE
    }

    /// Pitch indices reachable by the keys, inclusive. May extend past the
    /// end of the voice bank at the top octave.
    pub fn window(&self) -> RangeInclusive<usize> {
        let base = self.window_base();
        base..=base + NOTES_PER_OCTAVE * 2
    }

    /// Whether pitch index `index` should sound.
    pub fn is_note_on(&self, index: usize) -> bool {
        if !self.window().contains(&index) {
            return false;
        }
        self.mask.contains(WINDOW_NOTES - 1 - (index - self.window_base()))
    }

    /// Pitch indices that should sound, lowest first.
    pub fn notes_on(&self) -> impl Iterator<Item = usize> + '_ {
        self.window().filter(move |&index| self.is_note_on(index))
    }
}

/// Stateful wrapper remembering the last packet number and octave between
/// polling ticks.
#[derive(Debug, Clone)]
pub struct InputDecoder {
    last_packet: Option<u32>,
    octave: usize,
}

impl InputDecoder {
    pub fn new(start_octave: usize) -> Self {
        Self {
            last_packet: None,
            octave: start_octave.min(MAX_OCTAVE),
        }
    }

    pub fn octave(&self) -> usize {
        self.octave
    }

    /// Decode a snapshot, or `None` when its packet number was already seen.
    /// An unchanged packet leaves the decoder untouched.
    pub fn decode(&mut self, snapshot: &ControllerSnapshot) -> Option<DecodedPerformance> {
        if self.last_packet == Some(snapshot.packet_number) {
            return None;
        }
        self.last_packet = Some(snapshot.packet_number);

        let decoded = DecodedPerformance::decode(snapshot, self.octave);
        if decoded.octave != self.octave {
            debug!(from = self.octave, to = decoded.octave, "octave shift");
        }
        self.octave = decoded.octave;
        Some(decoded)
    }
}
