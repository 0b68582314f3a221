use thiserror::Error;

use crate::error::QuizError;
use crate::model::{AnswerPayload, Question, QuestionId, QuestionKind, RunCursor};
use crate::store::RunStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("the answer can only change while it is being collected")]
    NotCollecting,

    #[error("there is no feedback to dismiss")]
    NotInFeedback,

    #[error("no question is active")]
    NoActiveQuestion,

    #[error("question {0} does not take this kind of answer")]
    WrongQuestionKind(QuestionId),

    #[error("option {index} does not exist on question {question}")]
    OptionOutOfRange { question: QuestionId, index: usize },

    #[error(transparent)]
    Store(#[from] QuizError),
}

/// Unsubmitted answer, shaped by the kind of question it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    /// One entry per answer option once sized; empty until the first selection.
    Choices(Vec<bool>),
    Text(String),
}

impl Draft {
    pub fn for_question(question: Option<&Question>) -> Self {
        match question.map(|q| q.kind) {
            Some(QuestionKind::Text) => Draft::Text(String::new()),
            _ => Draft::Choices(Vec::new()),
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        match self {
            Draft::Choices(selected) => selected.get(index).copied().unwrap_or(false),
            Draft::Text(_) => false,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Draft::Text(text) => text,
            Draft::Choices(_) => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Draft::Choices(selected) => selected.is_empty(),
            Draft::Text(text) => text.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    /// `baseline` is the length of the correctness sequence when the answer
    /// was submitted; the result is known once the sequence grows past it.
    Feedback { baseline: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correctness {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunView {
    Active(usize),
    Completed { total: usize, correct: usize },
    /// Counter past the end of the question list. Rendered as nothing.
    OutOfRange,
}

impl RunView {
    pub fn select(counter: usize, correct: &[bool], question_count: usize) -> Self {
        if counter < question_count {
            RunView::Active(counter)
        } else if counter == question_count {
            RunView::Completed {
                total: question_count,
                correct: correct.iter().filter(|c| **c).count(),
            }
        } else {
            RunView::OutOfRange
        }
    }
}

/// Correctness of the most recently recorded answer; `false` when nothing
/// has been recorded yet.
pub fn derived_correctness(correct: &[bool]) -> bool {
    correct.last().copied().unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct AnswerSession {
    index: usize,
    draft: Draft,
    phase: Phase,
}

impl AnswerSession {
    pub fn new<S: RunStore + ?Sized>(store: &S) -> Self {
        let index = store.cursor().counter;
        Self {
            index,
            draft: Draft::for_question(store.questions().get(index)),
            phase: Phase::Collecting,
        }
    }

    /// Index of the question the session is showing. Follows the cursor while
    /// collecting and stays on the answered question during feedback.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.phase, Phase::Feedback { .. })
    }

    pub fn current_question<'s, S: RunStore + ?Sized>(&self, store: &'s S) -> Option<&'s Question> {
        store.questions().get(self.index)
    }

    pub fn view<S: RunStore + ?Sized>(&self, store: &S) -> RunView {
        RunView::select(self.index, &store.cursor().correct, store.questions().len())
    }

    /// Picks up cursor movement made by the store outside of `advance`.
    pub fn sync<S: RunStore + ?Sized>(&mut self, store: &S) {
        let counter = store.cursor().counter;
        if self.phase == Phase::Collecting && counter != self.index {
            log::debug!("cursor moved from {} to {}", self.index, counter);
            self.reset(store, counter);
        }
    }

    pub fn select_option<S: RunStore + ?Sized>(
        &mut self,
        store: &S,
        index: usize,
        selected: bool,
    ) -> Result<(), SessionError> {
        let question = self.editable_question(store)?;
        if !question.kind.has_options() {
            return Err(SessionError::WrongQuestionKind(question.id.clone()));
        }
        let count = question.answers.len();
        if index >= count {
            return Err(SessionError::OptionOutOfRange {
                question: question.id.clone(),
                index,
            });
        }
        let single = question.kind == QuestionKind::Single;

        if !matches!(self.draft, Draft::Choices(_)) {
            self.draft = Draft::Choices(Vec::new());
        }
        if let Draft::Choices(choices) = &mut self.draft {
            if choices.len() != count {
                choices.clear();
                choices.resize(count, false);
            }
            if single && selected {
                choices.iter_mut().for_each(|c| *c = false);
            }
            choices[index] = selected;
        }
        Ok(())
    }

    /// Flips option `index`: selects it for single choice, toggles it for
    /// multiple choice.
    pub fn toggle_option<S: RunStore + ?Sized>(
        &mut self,
        store: &S,
        index: usize,
    ) -> Result<(), SessionError> {
        let single = self
            .current_question(store)
            .map_or(false, |q| q.kind == QuestionKind::Single);
        let selected = single || !self.draft.is_selected(index);
        self.select_option(store, index, selected)
    }

    pub fn set_text<S: RunStore + ?Sized>(
        &mut self,
        store: &S,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let question = self.editable_question(store)?;
        if question.kind != QuestionKind::Text {
            return Err(SessionError::WrongQuestionKind(question.id.clone()));
        }
        self.draft = Draft::Text(value.into());
        Ok(())
    }

    /// Hands the draft to the store and switches to feedback.
    pub fn submit<S: RunStore + ?Sized>(&mut self, store: &mut S) -> Result<(), SessionError> {
        let question = self.editable_question(store)?;
        let id = question.id.clone();
        let payload = match (&self.draft, question.kind) {
            (Draft::Text(text), QuestionKind::Text) => AnswerPayload::Text(text.clone()),
            (Draft::Choices(choices), QuestionKind::Single | QuestionKind::Multiple) => {
                let mut choices = choices.clone();
                choices.resize(question.answers.len(), false);
                AnswerPayload::Choices(choices)
            }
            _ => return Err(SessionError::WrongQuestionKind(id)),
        };

        let baseline = store.cursor().correct.len();
        store.record_answer(&id, payload)?;
        log::debug!("submitted answer for {}", id);
        self.phase = Phase::Feedback { baseline };
        Ok(())
    }

    /// Result of the submitted answer, or `None` while collecting.
    pub fn correctness(&self, cursor: &RunCursor) -> Option<Correctness> {
        let Phase::Feedback { baseline } = self.phase else {
            return None;
        };
        if cursor.correct.len() <= baseline {
            return Some(Correctness::Pending);
        }
        Some(if derived_correctness(&cursor.correct) {
            Correctness::Correct
        } else {
            Correctness::Incorrect
        })
    }

    /// Leaves feedback and moves to whatever question the cursor points at.
    pub fn advance<S: RunStore + ?Sized>(&mut self, store: &S) -> Result<(), SessionError> {
        if !self.is_answered() {
            return Err(SessionError::NotInFeedback);
        }
        self.reset(store, store.cursor().counter);
        Ok(())
    }

    fn reset<S: RunStore + ?Sized>(&mut self, store: &S, index: usize) {
        self.index = index;
        self.draft = Draft::for_question(store.questions().get(index));
        self.phase = Phase::Collecting;
    }

    fn editable_question<'s, S: RunStore + ?Sized>(
        &self,
        store: &'s S,
    ) -> Result<&'s Question, SessionError> {
        if self.is_answered() {
            return Err(SessionError::NotCollecting);
        }
        self.current_question(store)
            .ok_or(SessionError::NoActiveQuestion)
    }
}
