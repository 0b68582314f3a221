use chrono::{DateTime, Utc};

use crate::i18n::Messages;
use crate::model::QuestionKind;
use crate::render::{RenderCache, RenderJob};
use crate::session::{AnswerSession, RunView};
use crate::store::RunStore;
use crate::timer::elapsed_since;

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Feedback,
    ConfirmQuit,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Navigation,
    ChoiceSelect,
    TextInput,
}

/// Everything the terminal front end needs between two frames.
#[derive(Debug)]
pub struct AppState {
    pub title: String,
    pub session: AnswerSession,
    pub markup: RenderCache,
    pub messages: Messages,
    pub input_mode: InputMode,
    pub dialog_stack: Vec<Dialog>,
    pub choice_cursor: usize,
    pub text_cursor: usize,
    pub question_scroll: usize,
    pub started_at: DateTime<Utc>,
    pub should_quit: bool,
    shown_index: usize,
}

impl AppState {
    pub fn new<S: RunStore + ?Sized>(title: String, store: &S, messages: Messages) -> Self {
        let session = AnswerSession::new(store);
        let shown_index = session.index();
        let mut state = Self {
            title,
            session,
            markup: RenderCache::new(),
            messages,
            input_mode: InputMode::Navigation,
            dialog_stack: Vec::new(),
            choice_cursor: 0,
            text_cursor: 0,
            question_scroll: 0,
            started_at: Utc::now(),
            should_quit: false,
            shown_index,
        };
        state.update_input_mode(store);
        state
    }

    /// Brings the session up to date with the store and returns a render job
    /// when the question text on screen changed.
    pub fn sync<S: RunStore + ?Sized>(&mut self, store: &S) -> Option<RenderJob> {
        self.session.sync(store);
        if self.session.index() != self.shown_index {
            self.shown_index = self.session.index();
            self.reset_cursors();
        }
        self.update_input_mode(store);

        let question = self.session.current_question(store)?;
        self.markup.request(&question.text)
    }

    pub fn submit<S: RunStore + ?Sized>(&mut self, store: &mut S) {
        if !matches!(self.session.view(store), RunView::Active(_)) {
            return;
        }
        match self.session.submit(store) {
            Ok(()) => self.push_dialog(Dialog::Feedback),
            Err(e) => log::warn!("submit rejected: {}", e),
        }
    }

    pub fn dismiss_feedback<S: RunStore + ?Sized>(&mut self, store: &S) {
        if self.top_dialog() == Some(&Dialog::Feedback) {
            self.pop_dialog();
        }
        match self.session.advance(store) {
            Ok(()) => {
                self.shown_index = self.session.index();
                self.reset_cursors();
                self.update_input_mode(store);
            }
            Err(e) => log::debug!("nothing to advance: {}", e),
        }
    }

    pub fn toggle_choice<S: RunStore + ?Sized>(&mut self, store: &S, idx: usize) {
        match self.session.toggle_option(store, idx) {
            Ok(()) => self.choice_cursor = idx,
            Err(e) => log::debug!("choice ignored: {}", e),
        }
    }

    /// Applies `edit` to a copy of the text draft and stores the result.
    pub fn edit_text<S, F>(&mut self, store: &S, edit: F)
    where
        S: RunStore + ?Sized,
        F: FnOnce(&mut String, &mut usize),
    {
        let mut text = self.session.draft().text().to_string();
        let mut cursor = self.text_cursor.min(text.len());
        edit(&mut text, &mut cursor);
        match self.session.set_text(store, text) {
            Ok(()) => self.text_cursor = cursor,
            Err(e) => log::debug!("text edit ignored: {}", e),
        }
    }

    pub fn replace_text<S: RunStore + ?Sized>(&mut self, store: &S, text: String) {
        let len = text.len();
        self.edit_text(store, |t, c| {
            *t = text;
            *c = len;
        });
    }

    pub fn is_choice_selected(&self, idx: usize) -> bool {
        self.session.draft().is_selected(idx)
    }

    pub fn elapsed_seconds(&self) -> i64 {
        elapsed_since(self.started_at, Utc::now())
    }

    fn reset_cursors(&mut self) {
        self.choice_cursor = 0;
        self.text_cursor = 0;
        self.question_scroll = 0;
    }

    fn update_input_mode<S: RunStore + ?Sized>(&mut self, store: &S) {
        self.input_mode = match self.session.current_question(store).map(|q| q.kind) {
            Some(QuestionKind::Single | QuestionKind::Multiple) => InputMode::ChoiceSelect,
            Some(QuestionKind::Text) => InputMode::TextInput,
            None => InputMode::Navigation,
        };
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }
}
