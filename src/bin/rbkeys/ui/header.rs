//! Status line: octave, key range, volume, output device and levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rbkeys::{input::DecodedPerformance, TOTAL_NOTES};

use super::{keyboard::pitch_name, UiInit};

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    init: &UiInit,
    view: Option<&DecodedPerformance>,
    stats: &AudioStats,
) {
    let block = Block::default().title(" rbkeys ").borders(Borders::ALL);

    let mut spans = match view {
        Some(view) => {
            let window = view.window();
            let top = (*window.end()).min(TOTAL_NOTES - 1);
            vec![
                Span::styled(
                    format!(" Octave {}  ", view.octave),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{}-{}  ", pitch_name(*window.start()), pitch_name(top)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("Vol {:>3.0}%  ", view.volume * 100.0),
                    Style::default().fg(Color::Green),
                ),
                Span::styled(
                    format!("Keys {}  ", view.mask.count()),
                    Style::default().fg(Color::Yellow),
                ),
            ]
        }
        None => vec![Span::styled(
            format!(" Octave {}  waiting for controller  ", init.start_octave),
            Style::default().fg(Color::Yellow),
        )],
    };

    spans.extend([
        Span::styled(
            format!("{} {:.1}kHz x{}  ", init.device, init.sample_rate / 1000.0, init.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(if stats.peak >= 1.0 {
                Color::Red
            } else {
                Color::Magenta
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
