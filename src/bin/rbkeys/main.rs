//! rbkeys - play a keyboard controller as a polyphonic synth
//!
//! Run with: cargo run -- --demo

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rbkeys::{dsp::Waveform, EnvelopeConfig, InstrumentConfig, DEFAULT_OCTAVE};
use tracing_subscriber::EnvFilter;

use app::{App, InputChoice};

#[derive(Parser)]
#[clap(
    version,
    about = "Polyphonic synth for an XInput keyboard controller."
)]
struct Cli {
    /// Oscillator waveform.
    #[clap(long, value_enum, default_value_t = WaveformArg::Triangle)]
    waveform: WaveformArg,

    /// Attack time in seconds.
    #[clap(long, default_value_t = 0.01)]
    attack: f32,

    /// Decay time in seconds.
    #[clap(long, default_value_t = 0.3)]
    decay: f32,

    /// Sustain level, 0 to 1.
    #[clap(long, default_value_t = 0.8)]
    sustain: f32,

    /// Release time in seconds.
    #[clap(long, default_value_t = 0.05)]
    release: f32,

    /// Output gain applied to the summed notes.
    #[clap(long, default_value_t = 0.25)]
    gain: f32,

    /// Low-pass the mix at this cutoff (Hz).
    #[clap(long)]
    tone_cutoff: Option<f32>,

    /// Octave the key window starts on (0 to 4).
    #[clap(long, default_value_t = DEFAULT_OCTAVE)]
    octave: usize,

    /// Controller polling interval in milliseconds.
    #[clap(long, default_value_t = 10)]
    poll_ms: u64,

    /// Requested audio buffer size in frames. Device default if omitted.
    #[clap(long)]
    buffer_frames: Option<u32>,

    /// XInput user slot the keyboard is connected to.
    #[clap(long, default_value_t = 0)]
    slot: u32,

    /// Play a scripted chord progression instead of reading a controller.
    #[clap(long)]
    demo: bool,

    /// Run without the terminal UI, logging to stderr.
    #[clap(long)]
    headless: bool,

    /// Log file used while the terminal UI is up.
    #[clap(long, default_value = "rbkeys.log")]
    log_file: PathBuf,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum WaveformArg {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl From<WaveformArg> for Waveform {
    fn from(arg: WaveformArg) -> Self {
        match arg {
            WaveformArg::Sine => Waveform::Sine,
            WaveformArg::Triangle => Waveform::Triangle,
            WaveformArg::Saw => Waveform::Saw,
            WaveformArg::Square => Waveform::Square,
        }
    }
}

impl Cli {
    fn instrument_config(&self) -> InstrumentConfig {
        InstrumentConfig {
            envelope: EnvelopeConfig {
                attack: self.attack,
                decay: self.decay,
                sustain: self.sustain,
                release: self.release,
            },
            waveform: self.waveform.into(),
            master_gain: self.gain,
            tone_cutoff: self.tone_cutoff,
            start_octave: self.octave,
            ..Default::default()
        }
    }
}

fn init_logging(cli: &Cli) -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if cli.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // The terminal belongs to the UI, so logs go to a file.
        let file = File::create(&cli.log_file)
            .wrap_err_with(|| format!("failed to create log file {}", cli.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli)?;

    let input = if cli.demo {
        InputChoice::Demo
    } else {
        InputChoice::Controller { slot: cli.slot }
    };

    App::new(cli.instrument_config())
        .input(input)
        .poll_interval(std::time::Duration::from_millis(cli.poll_ms.max(1)))
        .buffer_frames(cli.buffer_frames)
        .headless(cli.headless)
        .run()
}
