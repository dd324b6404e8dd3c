//! Wiring: audio device, controller polling thread, and the UI (or a headless
//! wait loop) on the main thread.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{error, info};

use rbkeys::{
    controller::PerformanceController,
    engine::Engine,
    input::{DecodedPerformance, InputBackend, InputError, ScriptedInput},
    Error, InstrumentConfig,
};

use super::ui::{UiApp, UiInit};

/// Mono samples buffered for the oscilloscope (about a second at 48 kHz).
const SCOPE_QUEUE_SIZE: usize = 1 << 16;
const VIEW_QUEUE_SIZE: usize = 64;

#[derive(Debug, Clone, Copy)]
pub enum InputChoice {
    /// XInput keyboard in the given user slot.
    Controller { slot: u32 },
    /// Built-in chord progression.
    Demo,
}

/// Main application builder
pub struct App {
    config: InstrumentConfig,
    input: InputChoice,
    poll_interval: Duration,
    buffer_frames: Option<u32>,
    headless: bool,
}

type PollThread = JoinHandle<Result<(), InputError>>;

impl App {
    pub fn new(config: InstrumentConfig) -> Self {
        Self {
            config,
            input: InputChoice::Controller { slot: 0 },
            poll_interval: Duration::from_millis(10),
            buffer_frames: None,
            headless: false,
        }
    }

    pub fn input(mut self, input: InputChoice) -> Self {
        self.input = input;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn buffer_frames(mut self, frames: Option<u32>) -> Self {
        self.buffer_frames = frames;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Run until the UI quits, the controller fails, or the stream dies.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(Error::UnsupportedSampleFormat(supported.sample_format().to_string()).into());
        }

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        let device_name = device.name().unwrap_or_else(|_| "unknown device".to_string());
        let mut stream_config: cpal::StreamConfig = supported.into();
        if let Some(frames) = self.buffer_frames {
            stream_config.buffer_size = cpal::BufferSize::Fixed(frames);
        }
        info!(device = %device_name, sample_rate, channels, "audio output");

        // Tone generators learn the sample rate here, before the first callback.
        let (mut engine, bank) = Engine::new(sample_rate, &self.config);

        let mut controller =
            PerformanceController::new(open_input(self.input)?, bank, self.config.start_octave());
        // Fail before any audio starts if the controller cannot be read.
        controller.tick().wrap_err("failed to read controller")?;

        let (controller, mut scope_tx, feeds) = attach_ui(controller, !self.headless);

        let stream_failed = Arc::new(AtomicBool::new(false));
        let failed = stream_failed.clone();
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match scope_tx.as_mut() {
                    Some(scope) => engine.render_interleaved(data, channels, |sample| {
                        let _ = scope.push(sample);
                    }),
                    None => engine.render_interleaved(data, channels, |_| {}),
                },
                move |err| {
                    error!(%err, "audio stream error");
                    failed.store(true, Ordering::Relaxed);
                },
                None,
            )
            .wrap_err("failed to open output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let running = Arc::new(AtomicBool::new(true));
        let poller = spawn_poller(controller, self.poll_interval, running.clone())?;

        let outcome = match feeds {
            None => {
                wait_headless(&poller, &stream_failed);
                Ok(())
            }
            Some(feeds) => {
                let init = UiInit {
                    device: device_name,
                    sample_rate,
                    channels,
                    start_octave: self.config.start_octave(),
                };
                let mut ui = UiApp::new(feeds.scope_rx, feeds.view_rx, init);
                let mut terminal = ratatui::init();
                let result = ui.run(&mut terminal, || {
                    !poller.is_finished() && !stream_failed.load(Ordering::Relaxed)
                });
                ratatui::restore();
                result
            }
        };

        running.store(false, Ordering::Relaxed);
        drop(stream);
        info!("stream stopped");

        poller
            .join()
            .map_err(|_| eyre!("controller thread panicked"))?
            .map_err(Error::from)?;
        if stream_failed.load(Ordering::Relaxed) {
            return Err(eyre!("audio stream failed, see log for details"));
        }
        outcome
    }
}

/// Read ends of the buffers feeding the terminal UI.
struct UiFeeds {
    scope_rx: Consumer<f32>,
    view_rx: Consumer<DecodedPerformance>,
}

/// Wire the UI's buffers: the returned producer goes to the audio callback,
/// and the controller forwards every applied packet. Without a UI nothing is
/// allocated and the controller is returned untouched.
fn attach_ui<I: InputBackend + 'static>(
    controller: PerformanceController<I>,
    with_ui: bool,
) -> (PerformanceController<I>, Option<Producer<f32>>, Option<UiFeeds>) {
    if !with_ui {
        return (controller, None, None);
    }

    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE_SIZE);
    let (mut view_tx, view_rx) = RingBuffer::<DecodedPerformance>::new(VIEW_QUEUE_SIZE);
    // The startup tick ran before the observer existed.
    if let Some(decoded) = controller.last_decoded() {
        let _ = view_tx.push(*decoded);
    }
    let controller = controller.with_observer(move |decoded| {
        let _ = view_tx.push(*decoded);
    });

    (controller, Some(scope_tx), Some(UiFeeds { scope_rx, view_rx }))
}

fn open_input(choice: InputChoice) -> Result<Box<dyn InputBackend>, Error> {
    match choice {
        InputChoice::Demo => Ok(Box::new(ScriptedInput::demo())),
        InputChoice::Controller { slot } => open_controller(slot),
    }
}

#[cfg(windows)]
fn open_controller(slot: u32) -> Result<Box<dyn InputBackend>, Error> {
    Ok(Box::new(rbkeys::input::xinput::XInputBackend::open(slot)?))
}

#[cfg(not(windows))]
fn open_controller(_slot: u32) -> Result<Box<dyn InputBackend>, Error> {
    Err(Error::NoInputBackend)
}

fn spawn_poller(
    mut controller: PerformanceController<Box<dyn InputBackend>>,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> EyreResult<PollThread> {
    thread::Builder::new()
        .name("controller-poll".into())
        .spawn(move || {
            let result = controller.run(interval, &running);
            if let Err(err) = &result {
                error!(%err, "controller polling stopped");
            }
            result
        })
        .wrap_err("failed to spawn controller thread")
}

fn wait_headless(poller: &PollThread, stream_failed: &AtomicBool) {
    info!("playing, press Ctrl+C to stop");
    while !poller.is_finished() && !stream_failed.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbkeys::{
        input::scripted::{keys_down, ScriptStep},
        synth::VoiceBank,
    };

    fn controller() -> PerformanceController<ScriptedInput> {
        let (_bank, handle) = VoiceBank::new(8_000.0, &InstrumentConfig::default());
        let steps = vec![
            ScriptStep {
                state: keys_down(&[0], 0x7f),
                hold: 1,
            },
            ScriptStep {
                state: keys_down(&[4], 0x7f),
                hold: 1,
            },
        ];
        PerformanceController::new(ScriptedInput::new(steps), handle, 2)
    }

    #[test]
    fn headless_allocates_no_ui_buffers() {
        let (_controller, scope_tx, feeds) = attach_ui(controller(), false);
        assert!(scope_tx.is_none());
        assert!(feeds.is_none());
    }

    #[test]
    fn ui_sees_startup_packet_and_later_ones() {
        let mut controller = controller();
        controller.tick().unwrap();

        let (mut controller, scope_tx, feeds) = attach_ui(controller, true);
        assert!(scope_tx.is_some());
        let mut feeds = feeds.expect("ui feeds");

        controller.tick().unwrap();
        let first = feeds.view_rx.pop().unwrap();
        let second = feeds.view_rx.pop().unwrap();
        assert!(first.is_note_on(24));
        assert!(second.is_note_on(28));
        assert!(feeds.view_rx.pop().is_err());
    }
}
