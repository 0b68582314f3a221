use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::session::Correctness;
use crate::state::{AppState, Dialog};
use crate::store::RunStore;

pub fn draw_dialog<S: RunStore + ?Sized>(f: &mut Frame, area: Rect, state: &AppState, store: &S) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::Feedback => draw_feedback(f, area, state, store),
        Dialog::ConfirmQuit => draw_confirm_quit(f, area, state),
        Dialog::Help => draw_help(f, area, state),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_feedback<S: RunStore + ?Sized>(f: &mut Frame, area: Rect, state: &AppState, store: &S) {
    let correctness = state
        .session
        .correctness(store.cursor())
        .unwrap_or(Correctness::Pending);
    let (title_key, text_key, color) = match correctness {
        Correctness::Correct => ("answer-correct-title", "answer-correct", Color::Green),
        Correctness::Incorrect => ("answer-wrong-title", "answer-wrong", Color::Red),
        Correctness::Pending => ("answer-pending-title", "answer-pending", Color::Yellow),
    };

    let messages = &state.messages;
    let text = messages.get(text_key);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", messages.get(title_key)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("   {}", text)),
        Line::from(""),
        Line::from(Span::styled(
            format!("   [Enter] {}", messages.get("continue")),
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
    ];

    let width = (text.chars().count() as u16 + 8).max(40);
    let rect = centered_rect(width, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, rect);
}

fn draw_confirm_quit(f: &mut Frame, area: Rect, state: &AppState) {
    let messages = &state.messages;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", messages.get("confirm-quit")),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("   {}", messages.get("confirm-quit-text"))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("   [Enter] {}", messages.get("confirm")),
                Style::default().fg(Color::Green),
            ),
            Span::raw("    "),
            Span::styled(
                format!("[Esc] {}", messages.get("cancel")),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];

    let rect = centered_rect(52, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, rect);
}

fn draw_help(f: &mut Frame, area: Rect, state: &AppState) {
    let lines = vec![
        Line::from(""),
        Line::from("   Up/Down    Move between options"),
        Line::from("   a-z        Select/toggle option"),
        Line::from("   Space      Select/toggle option"),
        Line::from("   Enter      Submit choice / continue"),
        Line::from("   PgUp/PgDn  Scroll question"),
        Line::from("   Ctrl+E     Open editor (text)"),
        Line::from("   Ctrl+S     Submit answer"),
        Line::from("   Ctrl+Q     Quit"),
        Line::from("   ?          This help"),
        Line::from("   Esc        Close dialog"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let rect = centered_rect(44, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", state.messages.get("help")))
        .border_style(Style::default().fg(Color::Cyan));
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, rect);
}
