use std::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::Lang;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: Option<String>,
    #[serde(default)]
    pub lang: Option<Lang>,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    pub frontmatter: Frontmatter,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn for_number(number: u32) -> Self {
        Self(format!("q{}", number))
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Single,
    Multiple,
    Text,
}

impl QuestionKind {
    pub fn has_options(self) -> bool {
        matches!(self, QuestionKind::Single | QuestionKind::Multiple)
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub number: u32,
    pub title: String,
    pub kind: QuestionKind,
    /// Raw markdown, math notation left intact.
    pub text: String,
    pub answers: Vec<AnswerOption>,
    /// Accepted free-text answers. Only consulted when judging.
    pub accepted: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AnswerOption {
    pub text: String,
    pub correct: bool,
}

/// Position of a run plus the outcome of every answered question so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCursor {
    pub counter: usize,
    pub correct: Vec<bool>,
}

impl RunCursor {
    pub fn correct_count(&self) -> usize {
        self.correct.iter().filter(|c| **c).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerPayload {
    Choices(Vec<bool>),
    Text(String),
}
