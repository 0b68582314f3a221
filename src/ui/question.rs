use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::model::{Question, QuestionKind};
use crate::state::AppState;
use crate::store::RunStore;
use crate::ui::markup::html_to_lines;

/// Maps content lines to clickable elements for mouse handling.
pub struct QuestionHitMap {
    pub button_line: usize,
    /// (first_content_line, choice_index) for each answer option.
    pub choice_lines: Vec<(usize, usize)>,
    pub total_lines: usize,
}

impl QuestionHitMap {
    /// Option under `content_line`, if any.
    pub fn choice_at(&self, content_line: usize) -> Option<usize> {
        for (ci, &(start, idx)) in self.choice_lines.iter().enumerate() {
            let end = self
                .choice_lines
                .get(ci + 1)
                .map_or(self.button_line.saturating_sub(1), |next| next.0);
            if content_line >= start && content_line < end {
                return Some(idx);
            }
        }
        None
    }
}

/// Compute the hit map for the current question from the same lines draw_question renders.
pub fn compute_hit_map<S: RunStore + ?Sized>(
    state: &AppState,
    store: &S,
    area: Rect,
) -> Option<QuestionHitMap> {
    let question = state.session.current_question(store)?;
    Some(question_lines(state, question, store.questions().len(), area).1)
}

/// Clamp a scroll offset so the last page stays filled.
pub fn clamp_scroll(scroll: usize, total_lines: usize, visible_height: usize) -> usize {
    scroll.min(total_lines.saturating_sub(visible_height))
}

/// Wrap a styled Line at `width`, preserving span styles across breaks.
fn wrap_styled_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line];
    }

    let total_width: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
    if total_width <= width {
        return vec![line];
    }

    // Flatten into (char, style) pairs
    let mut chars: Vec<(char, Style)> = Vec::new();
    for span in &line.spans {
        for c in span.content.chars() {
            chars.push((c, span.style));
        }
    }

    let mut result: Vec<Line<'static>> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars.len() - pos <= width {
            result.push(styled_chars_to_line(&chars[pos..]));
            break;
        }

        let chunk_end = pos + width;
        let break_at = if chars[chunk_end].0 == ' ' {
            chunk_end
        } else if let Some(sp) = chars[pos..chunk_end].iter().rposition(|(c, _)| *c == ' ') {
            if sp > 0 { pos + sp } else { chunk_end }
        } else {
            chunk_end
        };

        result.push(styled_chars_to_line(&chars[pos..break_at]));
        pos = break_at;
        if pos < chars.len() && chars[pos].0 == ' ' {
            pos += 1;
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }

    result
}

/// Rebuild a Line from (char, style) pairs, grouping consecutive same-style chars into spans.
fn styled_chars_to_line(chars: &[(char, Style)]) -> Line<'static> {
    let Some(&(_, first_style)) = chars.first() else {
        return Line::from("");
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_text = String::new();
    let mut current_style = first_style;

    for &(c, style) in chars {
        if style != current_style && !current_text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current_text), current_style));
        }
        current_style = style;
        current_text.push(c);
    }
    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, current_style));
    }

    Line::from(spans)
}

/// Word-wrap a line, returning (start_byte_offset, display_text) for each visual row.
fn wrap_with_offsets(text: &str, width: usize) -> Vec<(usize, String)> {
    if text.is_empty() {
        return vec![(0, String::new())];
    }
    if width == 0 {
        return vec![(0, text.to_string())];
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |(b, _)| *b);

    let mut result: Vec<(usize, String)> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars.len() - pos <= width {
            result.push((byte_at(pos), text[byte_at(pos)..].to_string()));
            break;
        }

        let start = byte_at(pos);
        if chars[pos + width].1 == ' ' {
            result.push((start, text[start..byte_at(pos + width)].to_string()));
            pos += width + 1;
        } else if let Some(sp) = chars[pos..pos + width].iter().rposition(|(_, c)| *c == ' ') {
            if sp > 0 {
                result.push((start, text[start..byte_at(pos + sp)].to_string()));
                pos += sp + 1;
            } else {
                result.push((start, text[start..byte_at(pos + width)].to_string()));
                pos += width;
            }
        } else {
            result.push((start, text[start..byte_at(pos + width)].to_string()));
            pos += width;
        }
    }

    if result.is_empty() {
        result.push((0, String::new()));
    }

    result
}

/// Find the visual (row_within_line, byte_col) for a cursor at byte `cursor_col` in a wrapped line.
fn find_visual_cursor(wraps: &[(usize, String)], cursor_col: usize) -> (usize, usize) {
    for (i, (start, text)) in wraps.iter().enumerate() {
        let next_start = wraps.get(i + 1).map_or(usize::MAX, |w| w.0);
        if cursor_col < next_start || i == wraps.len() - 1 {
            return (i, cursor_col.saturating_sub(*start).min(text.len()));
        }
    }
    (0, 0)
}

/// Wrap text to fit within `width` columns, breaking at word boundaries.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

fn choice_lines(
    state: &AppState,
    question: &Question,
    width: u16,
    lines: &mut Vec<Line<'static>>,
    hits: &mut Vec<(usize, usize)>,
) {
    let single = question.kind == QuestionKind::Single;
    let collecting = !state.session.is_answered();

    for (i, option) in question.answers.iter().enumerate() {
        let is_selected = state.is_choice_selected(i);
        let letter = (b'a' + (i % 26) as u8) as char;
        let mark = match (single, is_selected) {
            (true, true) => "(●)",
            (true, false) => "( )",
            (false, true) => "[x]",
            (false, false) => "[ ]",
        };
        let marker = if collecting && state.choice_cursor == i { "▸" } else { " " };

        let style = if is_selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };

        // Prefix: " ▸(●) a. "
        let prefix = format!(" {}{} {}. ", marker, mark, letter);
        let prefix_len = prefix.chars().count();
        let text_width = (width as usize).saturating_sub(prefix_len + 2);

        hits.push((lines.len(), i));
        for (li, wline) in wrap_text(&option.text, text_width).into_iter().enumerate() {
            let lead = if li == 0 {
                Span::styled(prefix.clone(), style)
            } else {
                Span::raw(" ".repeat(prefix_len))
            };
            lines.push(Line::from(vec![lead, Span::styled(wline, style)]));
        }
    }
}

fn cursor_spans(row_text: &str, col: usize, inner_w: usize) -> Vec<Span<'static>> {
    let text_style = Style::default().fg(Color::White);
    let cursor_style = Style::default().fg(Color::Black).bg(Color::White);
    let col = col.min(row_text.len());
    let before = &row_text[..col];
    let mut spans = vec![Span::styled(before.to_string(), text_style)];

    let width = row_text.chars().count();
    match row_text[col..].chars().next() {
        Some(c) => {
            spans.push(Span::styled(c.to_string(), cursor_style));
            spans.push(Span::styled(row_text[col + c.len_utf8()..].to_string(), text_style));
            spans.push(Span::raw(" ".repeat(inner_w.saturating_sub(width))));
        }
        None => {
            spans.push(Span::styled(" ".to_string(), cursor_style));
            spans.push(Span::raw(" ".repeat(inner_w.saturating_sub(width + 1))));
        }
    }
    spans
}

fn text_editor_lines(
    state: &AppState,
    area: Rect,
    after_count: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let is_editing = !state.session.is_answered();
    let display_text = state.session.draft().text();

    let editor_inner = (area.height as usize)
        .saturating_sub(lines.len())
        .saturating_sub(2) // top + bottom border
        .saturating_sub(after_count)
        .clamp(3, 12);
    let dashes = area.width.saturating_sub(6) as usize;
    let inner_w = area.width.saturating_sub(8) as usize;

    let text_lines: Vec<&str> = display_text.split('\n').collect();

    let pos = state.text_cursor.min(display_text.len());
    let before = &display_text[..pos];
    let cursor_row = before.matches('\n').count();
    let cursor_col = before.rfind('\n').map_or(pos, |p| pos - p - 1);

    let mut visual_rows: Vec<String> = Vec::new();
    let mut cursor_vrow: usize = 0;
    let mut cursor_vcol: usize = 0;
    for (li, line_text) in text_lines.iter().enumerate() {
        let wraps = wrap_with_offsets(line_text, inner_w);
        if li == cursor_row {
            let (vr, vc) = find_visual_cursor(&wraps, cursor_col);
            cursor_vrow = visual_rows.len() + vr;
            cursor_vcol = vc;
        }
        visual_rows.extend(wraps.into_iter().map(|(_, display)| display));
    }

    let indicator = if display_text.is_empty() {
        String::new()
    } else {
        format!("[line {} of {}]", cursor_row + 1, text_lines.len())
    };
    let left_dashes = dashes.saturating_sub(indicator.chars().count());
    lines.push(Line::from(vec![
        Span::raw("  ┌"),
        Span::raw("─".repeat(left_dashes)),
        Span::styled(indicator, Style::default().fg(Color::DarkGray)),
        Span::raw("┐"),
    ]));

    let scroll = (cursor_vrow + 1).saturating_sub(editor_inner);
    for vi in 0..editor_inner {
        let row_idx = scroll + vi;
        let mut spans = vec![Span::raw("  │ ")];
        match visual_rows.get(row_idx) {
            Some(_) if row_idx == 0 && display_text.is_empty() && !is_editing => {
                let placeholder = state.messages.get("text-answer-placeholder");
                spans.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
                spans.push(Span::raw(
                    " ".repeat(inner_w.saturating_sub(placeholder.chars().count())),
                ));
            }
            Some(row_text) if is_editing && row_idx == cursor_vrow => {
                spans.extend(cursor_spans(row_text, cursor_vcol, inner_w));
            }
            Some(row_text) => {
                spans.push(Span::styled(row_text.clone(), Style::default().fg(Color::White)));
                spans.push(Span::raw(
                    " ".repeat(inner_w.saturating_sub(row_text.chars().count())),
                ));
            }
            None => spans.push(Span::raw(" ".repeat(inner_w))),
        }
        spans.push(Span::raw(" │"));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(vec![
        Span::raw("  └"),
        Span::raw("─".repeat(dashes)),
        Span::raw("┘"),
    ]));
}

/// Every content line of the question view plus where its clickable parts are.
fn question_lines(
    state: &AppState,
    question: &Question,
    total: usize,
    area: Rect,
) -> (Vec<Line<'static>>, QuestionHitMap) {
    let mut lines: Vec<Line<'static>> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        format!(
            "  {}",
            state.messages.format(
                "question-header",
                &[
                    ("n", (state.session.index() + 1).to_string()),
                    ("total", total.to_string()),
                ],
            )
        ),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", question.title),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    // Body (with wrapping)
    let body_wrap_width = (area.width as usize).saturating_sub(4);
    for line in html_to_lines(state.markup.html()) {
        for wline in wrap_styled_line(line, body_wrap_width) {
            let indented = Line::from(
                std::iter::once(Span::raw("  "))
                    .chain(wline.spans)
                    .collect::<Vec<_>>(),
            );
            lines.push(indented);
        }
    }

    // Answer widget
    let mut choice_hits = Vec::new();
    lines.push(Line::from(""));
    match question.kind {
        QuestionKind::Single | QuestionKind::Multiple => {
            choice_lines(state, question, area.width, &mut lines, &mut choice_hits);
        }
        QuestionKind::Text => text_editor_lines(state, area, 2, &mut lines),
    }

    // Submit button
    lines.push(Line::from(""));
    let button_line = lines.len();
    let enabled = !state.session.is_answered() && !state.session.draft().is_empty();
    let button_style = if enabled {
        Style::default()
            .fg(Color::White)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Rgb(50, 50, 50))
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!(" ✓ {} ", state.messages.get("submit")), button_style),
        Span::styled("  Ctrl+S", Style::default().fg(Color::DarkGray)),
    ]));

    let hit_map = QuestionHitMap {
        button_line,
        choice_lines: choice_hits,
        total_lines: lines.len(),
    };
    (lines, hit_map)
}

pub fn draw_question<S: RunStore + ?Sized>(f: &mut Frame, area: Rect, state: &AppState, store: &S) {
    let Some(question) = state.session.current_question(store) else {
        return;
    };

    let (lines, _) = question_lines(state, question, store.questions().len(), area);

    // Apply scroll with clamping
    let total_content_lines = lines.len();
    let visible_height = area.height as usize;
    let scroll = clamp_scroll(state.question_scroll, total_content_lines, visible_height);
    let display_lines: Vec<Line> = lines.into_iter().skip(scroll).collect();

    f.render_widget(Paragraph::new(display_lines), area);

    if total_content_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(total_content_lines)
            .position(scroll)
            .viewport_content_length(visible_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}
