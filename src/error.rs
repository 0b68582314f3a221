use thiserror::Error;

use crate::model::QuestionId;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Quiz file must start with YAML frontmatter (---)")]
    MissingFrontmatter,

    #[error("No closing --- for frontmatter")]
    UnclosedFrontmatter,

    #[error("Invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Question heading must be in format '## N. Title', got: {0}")]
    BadHeading(String),

    #[error("Question number {0} appears more than once")]
    DuplicateQuestion(u32),

    #[error("Question {0} is marked (Multi) but lists no options")]
    MultiWithoutOptions(u32),

    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("Question {0} is not the current question of the run")]
    NotCurrentQuestion(QuestionId),

    #[error("Answer shape does not match the kind of question {0}")]
    PayloadMismatch(QuestionId),

    #[error("The run is already complete")]
    RunComplete,
}
