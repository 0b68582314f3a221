use clap::Parser;

use quizrun::cli::Cli;
use quizrun::i18n::Messages;
use quizrun::model::{Quiz, QuestionKind};
use quizrun::parser;
use quizrun::state::AppState;
use quizrun::store::{LocalRun, RunStore};
use quizrun::tui;

fn main() {
    pretty_env_logger::init_custom_env("QUIZRUN_LOG");

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.path)
        .map_err(|e| format!("Cannot read quiz file {}: {}", cli.path.display(), e))?;
    let quiz = parser::parse_quiz(&content)
        .map_err(|e| format!("Invalid quiz file {}: {}", cli.path.display(), e))?;

    let lang = cli.resolve_lang(quiz.frontmatter.lang);
    log::info!(
        "loaded {} ({} questions, lang {:?})",
        cli.path.display(),
        quiz.questions.len(),
        lang
    );

    if cli.summary {
        print_summary(&quiz);
        return Ok(());
    }

    let messages = Messages::new(lang);
    let mut run = LocalRun::new(quiz.questions);
    let state = AppState::new(quiz.title, &run, messages);

    tui::run_tui(state, &mut run)?;

    let results = &run.cursor().correct;
    if !results.is_empty() {
        let correct = results.iter().filter(|c| **c).count();
        println!(
            "{}",
            messages.format(
                "quiz-summary",
                &[
                    ("total", results.len().to_string()),
                    ("correct", correct.to_string()),
                ],
            )
        );
    }

    Ok(())
}

fn print_summary(quiz: &Quiz) {
    println!("{}", quiz.title);
    println!("{} questions", quiz.questions.len());
    for question in &quiz.questions {
        let kind = match question.kind {
            QuestionKind::Single => format!("single choice, {} options", question.answers.len()),
            QuestionKind::Multiple => {
                format!("multiple choice, {} options", question.answers.len())
            }
            QuestionKind::Text if question.accepted.is_empty() => "text".to_string(),
            QuestionKind::Text => format!("text, {} accepted", question.accepted.len()),
        };
        println!("  {:>3}. {} ({})", question.number, question.title, kind);
    }
}
