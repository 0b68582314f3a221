use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::AppState;
use crate::timer::format_duration;

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &AppState) {
    let elapsed = format!(
        " {} ",
        state.messages.format(
            "elapsed",
            &[("time", format_duration(state.elapsed_seconds()))],
        )
    );
    let elapsed_span = Span::styled(elapsed.clone(), Style::default().fg(Color::Rgb(200, 200, 120)));

    let title_text = format!("[ {} ]", state.title);
    let title_span = Span::styled(
        title_text.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Center the title over the full width, elapsed time right-aligned
    let available = area.width as usize;
    let title_len = title_text.chars().count();
    let elapsed_len = elapsed.chars().count();
    let center_pad = available.saturating_sub(title_len) / 2;
    let right_pad = available.saturating_sub(center_pad + title_len + elapsed_len);

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        title_span,
        Span::raw(" ".repeat(right_pad)),
        elapsed_span,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
