use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, Dialog, InputMode};

fn bindings(state: &AppState) -> Vec<(&'static str, &'static str)> {
    let keys: &[(&'static str, &'static str)] = match (state.top_dialog(), &state.input_mode) {
        (Some(Dialog::Feedback), _) => &[("Enter", "hint-continue"), ("Ctrl+Q", "hint-quit")],
        (Some(Dialog::ConfirmQuit), _) => &[("Enter", "hint-confirm"), ("Esc", "hint-cancel")],
        (Some(Dialog::Help), _) => &[("Esc", "hint-close")],
        (None, InputMode::TextInput) => &[
            ("←/→", "hint-cursor"),
            ("Enter", "hint-newline"),
            ("Ctrl+E", "hint-editor"),
            ("Ctrl+S", "hint-submit"),
            ("Ctrl+Q", "hint-quit"),
        ],
        (None, InputMode::ChoiceSelect) => &[
            ("a-z", "hint-answer"),
            ("arrows", "hint-move"),
            ("Space", "hint-toggle"),
            ("Enter", "hint-submit"),
            ("PgUp/PgDn", "hint-scroll"),
            ("Ctrl+Q", "hint-quit"),
        ],
        (None, InputMode::Navigation) => &[("Enter", "hint-exit"), ("Ctrl+Q", "hint-quit")],
    };
    keys.iter()
        .map(|&(key, action)| (key, state.messages.get(action)))
        .collect()
}

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let bindings = bindings(state);

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Lang, Messages};
    use crate::model::{AnswerOption, Question, QuestionId, QuestionKind};
    use crate::store::LocalRun;

    fn state(lang: Lang) -> AppState {
        let run = LocalRun::new(vec![Question {
            id: QuestionId::for_number(1),
            number: 1,
            title: "Pick".into(),
            text: "Pick one".into(),
            kind: QuestionKind::Single,
            answers: vec![
                AnswerOption { text: "a".into(), correct: true },
                AnswerOption { text: "b".into(), correct: false },
            ],
            accepted: Vec::new(),
        }]);
        AppState::new("Quiz".into(), &run, Messages::new(lang))
    }

    #[test]
    fn help_dialog_only_offers_close() {
        let mut s = state(Lang::En);
        s.push_dialog(Dialog::Help);
        assert_eq!(bindings(&s), vec![("Esc", "close")]);
    }

    #[test]
    fn hints_follow_the_language() {
        let s = state(Lang::De);
        let actions: Vec<&str> = bindings(&s).into_iter().map(|(_, a)| a).collect();
        assert!(actions.contains(&"abschicken"));
        assert!(actions.iter().all(|a| !a.starts_with("hint-")));
    }
}
