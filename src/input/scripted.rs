use crate::input::{buttons, ControllerSnapshot, InputBackend, InputError};

/// Replays a fixed list of controller states.
///
/// Each step is reported for `hold` polls under one packet number, the way a
/// real device repeats its last packet while nothing changes. Used by the
/// tests and by `--demo` on machines without a keyboard controller.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    cursor: usize,
    polls_in_step: u32,
    packet_number: u32,
    looping: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ScriptStep {
    pub state: ControllerSnapshot,
    /// Number of polls this state is reported for, at least one.
    pub hold: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            cursor: 0,
            polls_in_step: 0,
            packet_number: 1,
            looping: false,
        }
    }

    /// Start over from the first step instead of failing at the end.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// A short chord progression played in the window's lower octave.
    ///
    /// Keys are given as offsets from the lowest key (0..=24).
    pub fn demo() -> Self {
        const CHORDS: [&[usize]; 4] = [
            &[0, 4, 7, 12],   // C
            &[9, 12, 16, 21], // Am
            &[5, 9, 12, 17],  // F
            &[7, 11, 14, 19], // G
        ];

        let mut steps = Vec::new();
        for chord in CHORDS {
            steps.push(ScriptStep {
                state: keys_down(chord, 0x60),
                hold: 80,
            });
            steps.push(ScriptStep {
                state: keys_down(&[], 0x60),
                hold: 10,
            });
        }
        // one octave up and back again
        steps.push(ScriptStep {
            state: ControllerSnapshot {
                buttons: buttons::DPAD_RIGHT,
                ..keys_down(&[], 0x60)
            },
            hold: 1,
        });
        steps.push(ScriptStep {
            state: keys_down(&[0, 7, 12, 16], 0x40),
            hold: 120,
        });
        steps.push(ScriptStep {
            state: ControllerSnapshot {
                buttons: buttons::DPAD_LEFT,
                ..keys_down(&[], 0x60)
            },
            hold: 20,
        });

        Self::new(steps).looping()
    }
}

/// Snapshot with the given keys held (offsets from the lowest key) at a
/// 7-bit volume. Packet number is left at zero for the caller to fill in.
pub fn keys_down(keys: &[usize], volume: u8) -> ControllerSnapshot {
    let mask = keys
        .iter()
        .filter(|&&key| key <= 24)
        .fold(0u32, |mask, &key| mask | 1 << (24 - key));

    let lx = ((mask & 0x1fe) >> 1) as u16
        | ((volume & 0x7f) as u16) << 8
        | ((mask & 0x1) as u16) << 15;

    ControllerSnapshot {
        left_trigger: (mask >> 17) as u8,
        right_trigger: (mask >> 9) as u8,
        thumb_lx: lx as i16,
        ..Default::default()
    }
}

impl InputBackend for ScriptedInput {
    fn poll(&mut self) -> Result<ControllerSnapshot, InputError> {
        if self.cursor >= self.steps.len() {
            if !self.looping || self.steps.is_empty() {
                return Err(InputError::Exhausted);
            }
            self.cursor = 0;
        }

        let step = self.steps[self.cursor];
        let snapshot = ControllerSnapshot {
            packet_number: self.packet_number,
            ..step.state
        };

        self.polls_in_step += 1;
        if self.polls_in_step >= step.hold.max(1) {
            self.polls_in_step = 0;
            self.cursor += 1;
            self.packet_number = self.packet_number.wrapping_add(1);
        }

        Ok(snapshot)
    }
}
