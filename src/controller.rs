//! Input-poll side of the instrument.
//!
//! Each tick reads one snapshot, decodes it and pushes the result into the
//! voice bank's control handles. This is the only writer of note state
//! outside the audio callback.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use tracing::{debug, info};

use crate::{
    input::{DecodedPerformance, InputBackend, InputDecoder, InputError},
    synth::bank::BankHandle,
};

type Observer = Box<dyn FnMut(&DecodedPerformance) + Send>;

pub struct PerformanceController<I: InputBackend> {
    input: I,
    decoder: InputDecoder,
    bank: BankHandle,
    last_decoded: Option<DecodedPerformance>,
    observer: Option<Observer>,
}

impl<I: InputBackend> PerformanceController<I> {
    pub fn new(input: I, bank: BankHandle, start_octave: usize) -> Self {
        Self {
            input,
            decoder: InputDecoder::new(start_octave),
            bank,
            last_decoded: None,
            observer: None,
        }
    }

    /// Called after every applied packet, on the poll thread.
    pub fn with_observer(mut self, observer: impl FnMut(&DecodedPerformance) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn octave(&self) -> usize {
        self.decoder.octave()
    }

    pub fn last_decoded(&self) -> Option<&DecodedPerformance> {
        self.last_decoded.as_ref()
    }

    pub fn bank(&self) -> &BankHandle {
        &self.bank
    }

    /// Poll once. Returns the decoded packet if it was new and applied,
    /// `None` if the device had nothing new.
    pub fn tick(&mut self) -> Result<Option<DecodedPerformance>, InputError> {
        let snapshot = self.input.poll()?;
        let Some(decoded) = self.decoder.decode(&snapshot) else {
            return Ok(None);
        };

        self.apply(&decoded);
        debug!(
            packet = snapshot.packet_number,
            octave = decoded.octave,
            volume = decoded.volume,
            keys = decoded.mask.count(),
            "applied packet"
        );

        if let Some(observer) = self.observer.as_mut() {
            observer(&decoded);
        }
        self.last_decoded = Some(decoded);
        Ok(Some(decoded))
    }

    fn apply(&mut self, decoded: &DecodedPerformance) {
        for (index, note) in self.bank.iter_mut().enumerate() {
            note.set_volume(decoded.volume);
            if decoded.is_note_on(index) {
                note.enable();
            } else {
                note.disable();
            }
        }
    }

    /// Tick every `interval` until `running` is cleared. The first input
    /// error ends the loop; there is no retry.
    pub fn run(&mut self, interval: Duration, running: &AtomicBool) -> Result<(), InputError> {
        info!(interval_ms = interval.as_millis() as u64, "polling controller");
        while running.load(Ordering::Relaxed) {
            self.tick()?;
            thread::sleep(interval);
        }
        self.bank.release_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::InstrumentConfig,
        input::{
            buttons,
            scripted::{keys_down, ScriptStep, ScriptedInput},
            ControllerSnapshot,
        },
        synth::bank::VoiceBank,
    };

    fn controller(steps: Vec<ScriptStep>) -> PerformanceController<ScriptedInput> {
        let (_bank, handle) = VoiceBank::new(8_000.0, &InstrumentConfig::default());
        PerformanceController::new(ScriptedInput::new(steps), handle, 2)
    }

    fn step(state: ControllerSnapshot) -> ScriptStep {
        ScriptStep { state, hold: 1 }
    }

    #[test]
    fn keys_enable_notes_in_window() {
        let mut controller = controller(vec![step(keys_down(&[0, 4, 7], 0x7f))]);
        let decoded = controller.tick().unwrap().expect("new packet");

        assert_eq!(decoded.octave, 2);
        let enabled: Vec<usize> = controller.bank().enabled_notes().collect();
        assert_eq!(enabled, vec![24, 28, 31]);
        assert_eq!(controller.bank().note(24).volume(), 1.0);
    }

    #[test]
    fn released_keys_disable_notes() {
        let mut controller = controller(vec![
            step(keys_down(&[0, 4], 0x7f)),
            step(keys_down(&[4], 0x7f)),
        ]);
        controller.tick().unwrap();
        controller.tick().unwrap();

        let enabled: Vec<usize> = controller.bank().enabled_notes().collect();
        assert_eq!(enabled, vec![28]);
    }

    #[test]
    fn octave_shift_moves_held_notes() {
        let mut controller = controller(vec![
            step(keys_down(&[0], 0x7f)),
            step(ControllerSnapshot {
                buttons: buttons::DPAD_RIGHT,
                ..keys_down(&[0], 0x7f)
            }),
        ]);
        controller.tick().unwrap();
        controller.tick().unwrap();

        assert_eq!(controller.octave(), 3);
        let enabled: Vec<usize> = controller.bank().enabled_notes().collect();
        assert_eq!(enabled, vec![36]);
    }

    #[test]
    fn volume_is_applied_to_every_note() {
        let mut controller = controller(vec![step(keys_down(&[2], 0x3f))]);
        controller.tick().unwrap();

        let expected = 0x3f as f32 / 127.0;
        for index in [0, 26, 60] {
            assert!((controller.bank().note(index).volume() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn repeated_packet_is_ignored() {
        let mut controller = controller(vec![ScriptStep {
            state: keys_down(&[0], 0x7f),
            hold: 3,
        }]);

        assert!(controller.tick().unwrap().is_some());
        assert!(controller.tick().unwrap().is_none());
        assert!(controller.tick().unwrap().is_none());
        assert_eq!(controller.last_decoded().map(|d| d.octave), Some(2));
    }

    #[test]
    fn input_failure_is_returned() {
        let mut controller = controller(vec![]);
        assert!(matches!(controller.tick(), Err(InputError::Exhausted)));
    }

    #[test]
    fn observer_sees_applied_packets() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut controller = controller(vec![
            ScriptStep {
                state: keys_down(&[1], 0x7f),
                hold: 2,
            },
            step(keys_down(&[2], 0x7f)),
        ])
        .with_observer(move |decoded| sink.lock().unwrap().push(decoded.mask.bits()));

        for _ in 0..3 {
            controller.tick().unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![1 << 23, 1 << 22]);
    }

    #[test]
    fn run_stops_when_flag_clears_and_releases_notes() {
        let mut controller = controller(vec![ScriptStep {
            state: keys_down(&[0], 0x7f),
            hold: u32::MAX,
        }]);
        controller.tick().unwrap();
        assert_eq!(controller.bank().enabled_notes().count(), 1);

        let running = AtomicBool::new(false);
        controller.run(Duration::from_millis(1), &running).unwrap();
        assert_eq!(controller.bank().enabled_notes().count(), 0);
    }
}
