use crate::error::QuizError;
use crate::model::{AnswerPayload, Question, QuestionId, QuestionKind, RunCursor};

pub trait RunStore {
    fn cursor(&self) -> &RunCursor;

    fn questions(&self) -> &[Question];

    fn record_answer(
        &mut self,
        question_id: &QuestionId,
        payload: AnswerPayload,
    ) -> Result<(), QuizError>;
}

/// In-process run over a parsed quiz, judging answers against its answer key.
#[derive(Debug, Clone)]
pub struct LocalRun {
    questions: Vec<Question>,
    cursor: RunCursor,
}

impl LocalRun {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: RunCursor::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.counter >= self.questions.len()
    }
}

impl RunStore for LocalRun {
    fn cursor(&self) -> &RunCursor {
        &self.cursor
    }

    fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn record_answer(
        &mut self,
        question_id: &QuestionId,
        payload: AnswerPayload,
    ) -> Result<(), QuizError> {
        let index = self
            .questions
            .iter()
            .position(|q| &q.id == question_id)
            .ok_or_else(|| QuizError::UnknownQuestion(question_id.clone()))?;

        if self.is_complete() {
            return Err(QuizError::RunComplete);
        }
        if index != self.cursor.counter {
            return Err(QuizError::NotCurrentQuestion(question_id.clone()));
        }

        let correct = judge(&self.questions[index], &payload)?;
        log::info!(
            "question {} answered ({})",
            question_id,
            if correct { "correct" } else { "wrong" }
        );

        self.cursor.correct.push(correct);
        self.cursor.counter += 1;
        Ok(())
    }
}

/// Decide whether `payload` answers `question` correctly.
///
/// Choice answers must select exactly the marked options; missing trailing
/// entries count as unselected. Text answers match any accepted answer after
/// trimming, ignoring ASCII case. A text question without accepted answers
/// takes any non-blank answer.
pub fn judge(question: &Question, payload: &AnswerPayload) -> Result<bool, QuizError> {
    match (question.kind, payload) {
        (QuestionKind::Single | QuestionKind::Multiple, AnswerPayload::Choices(selected)) => {
            if selected.len() > question.answers.len() {
                return Err(QuizError::PayloadMismatch(question.id.clone()));
            }
            Ok(question.answers.iter().enumerate().all(|(i, option)| {
                selected.get(i).copied().unwrap_or(false) == option.correct
            }))
        }
        (QuestionKind::Text, AnswerPayload::Text(text)) => {
            let given = text.trim();
            if question.accepted.is_empty() {
                return Ok(!given.is_empty());
            }
            Ok(question
                .accepted
                .iter()
                .any(|a| a.trim().eq_ignore_ascii_case(given)))
        }
        _ => Err(QuizError::PayloadMismatch(question.id.clone())),
    }
}
