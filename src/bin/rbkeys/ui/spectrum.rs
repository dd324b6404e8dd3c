//! Spectrum of the output with markers at the held notes' fundamentals.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rbkeys::{input::DecodedPerformance, synth::frequency_for, TOTAL_NOTES};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

const SPECTRUM_BINS: usize = 64;
/// Lowest and highest displayed frequency. The bank spans roughly 65 Hz to
/// 2.1 kHz, so this leaves room for a few harmonics.
const MIN_FREQ: f64 = 40.0;
const MAX_FREQ: f64 = 8_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    /// Hann window
    window: Vec<f32>,
    /// Log-spaced FFT bin per display column
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 Hz, dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::<f32>::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let nyquist = sample_rate as f64 / 2.0;
        let max_freq = MAX_FREQ.min(nyquist).max(MIN_FREQ * 2.0);
        let half = buffer_len / 2;
        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = MIN_FREQ * (max_freq / MIN_FREQ).powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Recompute from `buffer`. Ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Normalise so a full-scale sine reads near 0 dB.
        let norm = (self.window.len() as f32 / 4.0).powi(2);
        for ((_, db), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let power = (self.scratch[index].norm_sqr() / norm).max(1e-12);
            *db = (10.0 * power.log10() as f64).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(
    frame: &mut Frame,
    area: Rect,
    spectrum: &[(f64, f64)],
    view: Option<&DecodedPerformance>,
) {
    let markers: Vec<(f64, f64)> = view
        .into_iter()
        .flat_map(|v| v.notes_on())
        .filter(|&index| index < TOTAL_NOTES)
        .map(|index| ((frequency_for(index) as f64).log10(), -6.0))
        .collect();

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(spectrum),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&markers),
    ];

    let (lo, hi) = match (spectrum.first(), spectrum.last()) {
        (Some(&(lo, _)), Some(&(hi, _))) if hi > lo => (lo, hi),
        _ => (MIN_FREQ.log10(), MAX_FREQ.log10()),
    };

    let chart = Chart::new(datasets)
        .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![
                    format!("{:.0}", 10f64.powf(lo)),
                    format!("{:.0}", 10f64.powf((lo + hi) / 2.0)),
                    format!("{:.0}k", 10f64.powf(hi) / 1000.0),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
