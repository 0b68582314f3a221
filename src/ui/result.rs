use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::AppState;
use crate::store::RunStore;

pub fn draw_completed<S: RunStore + ?Sized>(
    f: &mut Frame,
    area: Rect,
    state: &AppState,
    store: &S,
    total: usize,
    correct: usize,
) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("✓ {}", state.messages.get("quiz-completed")),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(state.messages.format(
            "quiz-summary",
            &[
                ("total", total.to_string()),
                ("correct", correct.to_string()),
            ],
        )),
        Line::from(""),
    ];

    let results = &store.cursor().correct;
    for (question, right) in store.questions().iter().zip(results) {
        let (icon, color) = if *right {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", icon), Style::default().fg(color)),
            Span::raw(format!("{}. {}", question.number, question.title)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[Enter] {}", state.messages.get("hint-exit")),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}
