use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::AppState;
use crate::store::RunStore;

pub fn draw_statusbar<S: RunStore + ?Sized>(f: &mut Frame, area: Rect, state: &AppState, store: &S) {
    let results = &store.cursor().correct;
    let correct = results.iter().filter(|c| **c).count();
    let wrong = results.len() - correct;
    let messages = &state.messages;

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!(
                "● {}",
                messages.format("progress", &[("answered", results.len().to_string())])
            ),
            Style::default().fg(Color::White),
        ),
        Span::raw("   "),
        Span::styled(
            format!(
                "✓ {}",
                messages.format("progress-correct", &[("correct", correct.to_string())])
            ),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!(
                "✗ {}",
                messages.format("progress-wrong", &[("wrong", wrong.to_string())])
            ),
            Style::default().fg(Color::Red),
        ),
        Span::raw("   "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
    ]);

    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
