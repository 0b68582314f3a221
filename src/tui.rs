use std::io;
use std::sync::mpsc;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::editor;
use crate::model::QuestionKind;
use crate::render::{RenderDone, RenderWorker};
use crate::state::*;
use crate::store::RunStore;
use crate::ui::layout::compute_layout;
use crate::ui::question::{clamp_scroll, compute_hit_map};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Runs the terminal front end until the user quits. Answers go to `store`.
pub fn run_tui(mut state: AppState, store: &mut dyn RunStore) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Cannot create terminal: {}", e))?;

    let (worker, done_rx) = RenderWorker::spawn();
    let result = main_loop(&mut terminal, &mut state, store, &worker, &done_rx);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    result
}

fn main_loop(
    terminal: &mut Term,
    state: &mut AppState,
    store: &mut dyn RunStore,
    worker: &RenderWorker,
    done_rx: &mpsc::Receiver<RenderDone>,
) -> Result<(), String> {
    loop {
        if let Some(job) = state.sync(&*store) {
            worker.dispatch(job);
        }

        // Handle finished renders
        while let Ok(done) = done_rx.try_recv() {
            state.markup.commit(done);
        }

        terminal
            .draw(|f| crate::ui::draw(f, state, &*store))
            .map_err(|e| format!("Draw error: {}", e))?;

        if state.should_quit {
            break;
        }

        // Poll for input events
        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("Poll error: {}", e))?
        {
            match event::read().map_err(|e| format!("Read error: {}", e))? {
                Event::Key(key) => handle_key(key, state, store, terminal)?,
                Event::Mouse(mouse) => {
                    let size = terminal.size().unwrap_or_default();
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse(mouse, state, store, area);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn handle_key(
    key: KeyEvent,
    state: &mut AppState,
    store: &mut dyn RunStore,
    terminal: &mut Term,
) -> Result<(), String> {
    if state.has_dialog() {
        handle_dialog_key(key, state, &*store);
        return Ok(());
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings
    if ctrl {
        match key.code {
            KeyCode::Char('q') => state.push_dialog(Dialog::ConfirmQuit),
            KeyCode::Char('s') => state.submit(store),
            KeyCode::Char('e') => open_external_editor(state, &*store, terminal)?,
            _ => {}
        }
        return Ok(());
    }

    match state.input_mode {
        InputMode::TextInput => handle_text_input_key(key, state, &*store),
        InputMode::ChoiceSelect => handle_choice_key(key, state, store),
        InputMode::Navigation => handle_nav_key(key, state),
    }
    Ok(())
}

fn open_external_editor(
    state: &mut AppState,
    store: &dyn RunStore,
    terminal: &mut Term,
) -> Result<(), String> {
    let is_text = state
        .session
        .current_question(store)
        .map_or(false, |q| q.kind == QuestionKind::Text);
    if !is_text || state.session.is_answered() {
        return Ok(());
    }
    let current_text = state.session.draft().text().to_string();

    // Suspend terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    match editor::open_editor(&current_text) {
        Ok(new_text) => state.replace_text(store, new_text),
        Err(e) => log::warn!("keeping draft, editor failed: {}", e),
    }

    // Restore terminal
    execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    terminal.clear().map_err(|e| format!("Cannot clear terminal: {}", e))?;
    Ok(())
}

fn handle_text_input_key(key: KeyEvent, state: &mut AppState, store: &dyn RunStore) {
    match key.code {
        KeyCode::Char(c) => state.edit_text(store, |text, cursor| {
            text.insert(*cursor, c);
            *cursor += c.len_utf8();
        }),
        KeyCode::Enter => state.edit_text(store, |text, cursor| {
            text.insert(*cursor, '\n');
            *cursor += 1;
        }),
        KeyCode::Backspace => state.edit_text(store, |text, cursor| {
            if let Some(prev) = text[..*cursor].chars().next_back() {
                *cursor -= prev.len_utf8();
                text.remove(*cursor);
            }
        }),
        KeyCode::Delete => state.edit_text(store, |text, cursor| {
            if *cursor < text.len() {
                text.remove(*cursor);
            }
        }),
        KeyCode::Left => state.edit_text(store, |text, cursor| {
            if let Some(prev) = text[..*cursor].chars().next_back() {
                *cursor -= prev.len_utf8();
            }
        }),
        KeyCode::Right => state.edit_text(store, |text, cursor| {
            if let Some(next) = text[*cursor..].chars().next() {
                *cursor += next.len_utf8();
            }
        }),
        KeyCode::Home => state.edit_text(store, |text, cursor| {
            *cursor = text[..*cursor].rfind('\n').map_or(0, |p| p + 1);
        }),
        KeyCode::End => state.edit_text(store, |text, cursor| {
            *cursor = text[*cursor..]
                .find('\n')
                .map_or(text.len(), |p| *cursor + p);
        }),
        KeyCode::Up => state.edit_text(store, |text, cursor| {
            *cursor = move_cursor_up(text, *cursor);
        }),
        KeyCode::Down => state.edit_text(store, |text, cursor| {
            *cursor = move_cursor_down(text, *cursor);
        }),
        _ => handle_page_keys(key, state),
    }
}

/// Row and column (in chars) of byte offset `cursor`.
fn cursor_row_col(text: &str, cursor: usize) -> (usize, usize) {
    let pos = cursor.min(text.len());
    let before = &text[..pos];
    let row = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (row, before[line_start..].chars().count())
}

/// Byte offset of `col` chars into line `row`, clamped to the line end.
fn offset_of(text: &str, row: usize, col: usize) -> usize {
    let mut offset = 0;
    for (i, line) in text.split('\n').enumerate() {
        if i == row {
            return offset
                + line
                    .char_indices()
                    .nth(col)
                    .map_or(line.len(), |(b, _)| b);
        }
        offset += line.len() + 1;
    }
    text.len()
}

fn move_cursor_up(text: &str, cursor: usize) -> usize {
    let (row, col) = cursor_row_col(text, cursor);
    if row == 0 {
        return cursor;
    }
    offset_of(text, row - 1, col)
}

fn move_cursor_down(text: &str, cursor: usize) -> usize {
    let (row, col) = cursor_row_col(text, cursor);
    if row + 1 >= text.split('\n').count() {
        return cursor;
    }
    offset_of(text, row + 1, col)
}

fn handle_choice_key(key: KeyEvent, state: &mut AppState, store: &mut dyn RunStore) {
    let count = state
        .session
        .current_question(&*store)
        .map_or(0, |q| q.answers.len());

    match key.code {
        KeyCode::Up | KeyCode::Left => {
            state.choice_cursor = state.choice_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Right => {
            if state.choice_cursor + 1 < count {
                state.choice_cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            let idx = state.choice_cursor;
            state.toggle_choice(&*store, idx);
        }
        KeyCode::Enter => state.submit(store),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        KeyCode::Char(c) if c.is_ascii_lowercase() => {
            let idx = (c as u8 - b'a') as usize;
            if idx < count {
                state.toggle_choice(&*store, idx);
            }
        }
        _ => handle_page_keys(key, state),
    }
}

fn handle_nav_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => state.should_quit = true,
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => handle_page_keys(key, state),
    }
}

fn handle_page_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::PageUp => {
            state.question_scroll = state.question_scroll.saturating_sub(5);
        }
        KeyCode::PageDown => {
            state.question_scroll += 5;
        }
        _ => {}
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState, store: &dyn RunStore) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match state.top_dialog().cloned() {
        Some(Dialog::Feedback) => match key.code {
            KeyCode::Char('q') if ctrl => state.push_dialog(Dialog::ConfirmQuit),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                state.dismiss_feedback(store);
            }
            _ => {}
        },
        Some(Dialog::ConfirmQuit) => match key.code {
            KeyCode::Enter => {
                state.pop_dialog();
                state.should_quit = true;
            }
            KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::Help) => match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                state.pop_dialog();
            }
            _ => {}
        },
        None => {}
    }
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState, store: &mut dyn RunStore, size: Rect) {
    if state.has_dialog() {
        return;
    }
    let layout = compute_layout(size);
    let main = layout.main;
    let (x, y) = (mouse.column, mouse.row);
    let in_main = x >= main.x && x < main.x + main.width && y >= main.y && y < main.y + main.height;
    if !in_main {
        return;
    }
    let Some(hit_map) = compute_hit_map(state, &*store, main) else {
        return;
    };
    let visible_height = main.height as usize;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let scroll = clamp_scroll(state.question_scroll, hit_map.total_lines, visible_height);
            let content_line = (y - main.y) as usize + scroll;
            if content_line == hit_map.button_line {
                state.submit(store);
            } else if let Some(idx) = hit_map.choice_at(content_line) {
                state.toggle_choice(&*store, idx);
            }
        }
        MouseEventKind::ScrollUp => {
            state.question_scroll = state.question_scroll.saturating_sub(1);
        }
        MouseEventKind::ScrollDown => {
            state.question_scroll =
                clamp_scroll(state.question_scroll + 1, hit_map.total_lines, visible_height);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_moves_between_lines_keeping_column() {
        let text = "first line\nab\nthird";
        let cursor = "first".len();
        let down = move_cursor_down(text, cursor);
        assert_eq!(down, "first line\nab".len());
        assert_eq!(move_cursor_down(text, down), "first line\nab\nth".len());
        assert_eq!(move_cursor_up(text, cursor), cursor);
    }

    #[test]
    fn columns_count_chars_not_bytes() {
        let text = "äöü\nabc";
        assert_eq!(cursor_row_col(text, "äö".len()), (0, 2));
        assert_eq!(move_cursor_down(text, "äö".len()), "äöü\nab".len());
        assert_eq!(move_cursor_up(text, "äöü\na".len()), "ä".len());
    }
}
