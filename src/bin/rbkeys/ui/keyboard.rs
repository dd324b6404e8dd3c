//! Piano strip covering the whole voice bank.
//!
//! Keys outside the playable window are dimmed, keys inside it are shaded
//! white/black, held keys light up.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rbkeys::{input::DecodedPerformance, NOTES_PER_OCTAVE, NUM_OCTAVES, TOTAL_NOTES};

const NAMES: [&str; NOTES_PER_OCTAVE] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Octave number of the lowest bank note (C2, 65.41 Hz).
const FIRST_OCTAVE: usize = 2;

/// Scientific pitch name of a bank index, e.g. 0 -> "C2".
pub fn pitch_name(index: usize) -> String {
    format!(
        "{}{}",
        NAMES[index % NOTES_PER_OCTAVE],
        index / NOTES_PER_OCTAVE + FIRST_OCTAVE
    )
}

fn is_black(index: usize) -> bool {
    matches!(index % NOTES_PER_OCTAVE, 1 | 3 | 6 | 8 | 10)
}

pub fn render_keyboard(
    frame: &mut Frame,
    area: Rect,
    view: Option<&DecodedPerformance>,
    start_octave: usize,
) {
    let block = Block::default().title(" Keys ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key_width = (inner.width as usize / TOTAL_NOTES).clamp(1, 3);
    let base = view.map_or(start_octave * NOTES_PER_OCTAVE, |v| v.window_base());
    let window = base..=base + 2 * NOTES_PER_OCTAVE;

    let keys: Vec<Span> = (0..TOTAL_NOTES)
        .map(|index| {
            let held = view.is_some_and(|v| v.is_note_on(index));
            let style = if held {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if !window.contains(&index) {
                Style::default().fg(Color::DarkGray)
            } else if is_black(index) {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::White)
            };
            let glyph = if held {
                "█"
            } else if is_black(index) {
                "▄"
            } else {
                "▀"
            };
            Span::styled(glyph.repeat(key_width), style)
        })
        .collect();

    // Octave labels under each C.
    let mut labels = String::new();
    for octave in 0..=NUM_OCTAVES {
        let label = pitch_name(octave * NOTES_PER_OCTAVE);
        let column = octave * NOTES_PER_OCTAVE * key_width;
        if column < labels.len() {
            continue;
        }
        labels.push_str(&" ".repeat(column - labels.len()));
        labels.push_str(&label);
    }

    let lines = vec![
        Line::from(keys.clone()),
        Line::from(keys),
        Line::styled(labels, Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
