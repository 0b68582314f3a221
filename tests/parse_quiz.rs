use std::fs;

use quizrun::error::QuizError;
use quizrun::i18n::Lang;
use quizrun::model::{QuestionId, QuestionKind};
use quizrun::parser::parse_quiz;

fn sample() -> quizrun::model::Quiz {
    let content = fs::read_to_string("fixtures/sample_quiz.md").expect("Cannot read fixture");
    parse_quiz(&content).unwrap()
}

#[test]
fn test_parse_sample_quiz() {
    let quiz = sample();

    assert_eq!(quiz.title, "Calculus Warmup");
    assert_eq!(quiz.frontmatter.lang, Some(Lang::En));
    assert_eq!(quiz.questions.len(), 4);

    let ids: Vec<String> = quiz.questions.iter().map(|q| q.id.to_string()).collect();
    assert_eq!(ids, vec!["q1", "q2", "q3", "q4"]);
}

#[test]
fn test_single_choice_options_and_key() {
    let quiz = sample();
    let q1 = &quiz.questions[0];

    assert_eq!(q1.number, 1);
    assert_eq!(q1.title, "Derivatives");
    assert_eq!(q1.kind, QuestionKind::Single);
    assert_eq!(q1.answers.len(), 4);
    assert_eq!(q1.answers[1].text, "$2x$");
    let marked: Vec<bool> = q1.answers.iter().map(|a| a.correct).collect();
    assert_eq!(marked, vec![false, true, false, false]);

    // Options are not part of the question text, math is left as written
    assert_eq!(
        q1.text,
        "What is the derivative of $x^2$ with respect to $x$?"
    );
}

#[test]
fn test_multi_marker_is_stripped_from_title() {
    let quiz = sample();
    let q2 = &quiz.questions[1];

    assert_eq!(q2.kind, QuestionKind::Multiple);
    assert_eq!(q2.title, "Continuous functions");
    let marked: Vec<bool> = q2.answers.iter().map(|a| a.correct).collect();
    assert_eq!(marked, vec![true, false, true, false]);
}

#[test]
fn test_text_question_with_accepted_answers() {
    let quiz = sample();
    let q3 = &quiz.questions[2];

    assert_eq!(q3.kind, QuestionKind::Text);
    assert_eq!(q3.id, QuestionId::for_number(3));
    assert!(q3.answers.is_empty());
    assert_eq!(q3.accepted, vec!["e".to_string(), "euler's number".to_string()]);
    assert!(q3.text.contains("$$\\lim_{n \\to \\infty}"));
    assert!(q3.text.ends_with("and name the constant."));
    assert!(!q3.text.contains("accept:"));
}

#[test]
fn test_code_block_stays_in_text() {
    let quiz = sample();
    let q4 = &quiz.questions[3];

    assert_eq!(q4.kind, QuestionKind::Text);
    assert!(q4.accepted.is_empty());
    assert!(q4.text.contains("```text\nf'(x) ≈ (f(x + h) - f(x)) / h\n```"));
}

#[test]
fn test_plain_list_is_question_text() {
    let src = "---\ntitle: Lists\n---\n## 1. Order\n\nSort these:\n\n- one\n- two\n";
    let quiz = parse_quiz(src).unwrap();
    let q = &quiz.questions[0];

    assert_eq!(q.kind, QuestionKind::Text);
    assert_eq!(q.text, "Sort these:\n\n- one\n- two");
}

#[test]
fn test_multi_without_options_is_rejected() {
    let src = "---\ntitle: T\n---\n## 7. Pick some (Multi)\n\nNothing to pick.\n";
    assert!(matches!(parse_quiz(src), Err(QuizError::MultiWithoutOptions(7))));
}

#[test]
fn test_bad_heading_is_rejected() {
    let src = "---\ntitle: T\n---\n## Intro\n\ntext\n";
    assert!(matches!(parse_quiz(src), Err(QuizError::BadHeading(_))));
}

#[test]
fn test_invalid_frontmatter_is_reported() {
    let src = "---\nlang: klingon\n---\n## 1. A\n\nx\n";
    assert!(matches!(parse_quiz(src), Err(QuizError::Frontmatter(_))));

    let src = "---\ntitle: T\n## 1. A\n";
    assert!(matches!(parse_quiz(src), Err(QuizError::UnclosedFrontmatter)));
}
