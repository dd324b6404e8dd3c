//! Terminal UI for rbkeys
//!
//! Shows the key window, held notes and the output signal while playing.

mod header;
mod keyboard;
mod spectrum;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rbkeys::input::DecodedPerformance;
use rtrb::Consumer;
use std::time::Duration;

use header::{render_header, AudioStats};
use keyboard::render_keyboard;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Samples kept for the scope and the FFT.
const SCOPE_SIZE: usize = 2048;

/// Fixed facts about the session, known before the UI starts.
pub struct UiInit {
    pub device: String,
    pub sample_rate: f32,
    pub channels: usize,
    pub start_octave: usize,
}

pub struct UiApp {
    scope_rx: Consumer<f32>,
    view_rx: Consumer<DecodedPerformance>,
    init: UiInit,
    /// Latest applied packet, `None` until the first one arrives.
    view: Option<DecodedPerformance>,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        scope_rx: Consumer<f32>,
        view_rx: Consumer<DecodedPerformance>,
        init: UiInit,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(SCOPE_SIZE, init.sample_rate);
        Self {
            scope_rx,
            view_rx,
            init,
            view: None,
            scope: vec![0.0; SCOPE_SIZE],
            spectrum,
            should_quit: false,
        }
    }

    /// Draw at roughly 60 fps until the user quits or `keep_running`
    /// returns false.
    pub fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        mut keep_running: impl FnMut() -> bool,
    ) -> EyreResult<()> {
        while !self.should_quit && keep_running() {
            self.poll_scope();
            self.poll_view();
            self.spectrum.update(&self.scope);

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn poll_scope(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }
        // Only the newest SCOPE_SIZE samples matter; skip the rest.
        let skip = available.saturating_sub(SCOPE_SIZE);
        for _ in 0..skip {
            let _ = self.scope_rx.pop();
        }
        let fresh = available - skip;
        self.scope.drain(..fresh);
        for _ in 0..fresh {
            let sample = self.scope_rx.pop().unwrap_or(0.0);
            self.scope.push(sample);
        }
    }

    fn poll_view(&mut self) {
        while let Ok(view) = self.view_rx.pop() {
            self.view = Some(view);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
            self.should_quit = true;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Length(5), // keyboard
                Constraint::Min(6),    // scope + spectrum
                Constraint::Length(1), // help
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.scope);
        render_header(frame, chunks[0], &self.init, self.view.as_ref(), &stats);
        render_keyboard(
            frame,
            chunks[1],
            self.view.as_ref(),
            self.init.start_octave,
        );

        let signal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, signal[0], &self.scope, self.init.sample_rate);
        render_spectrum(frame, signal[1], self.spectrum.data(), self.view.as_ref());

        let help = Paragraph::new(" [Q] Quit  octave: d-pad left/right on the keyboard")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
