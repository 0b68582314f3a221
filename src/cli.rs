use std::path::PathBuf;

use clap::Parser;

use crate::i18n::Lang;

#[derive(Parser, Debug)]
#[command(name = "quizrun", version, about = "Run a markdown quiz in the terminal")]
pub struct Cli {
    /// Quiz file (markdown with YAML frontmatter)
    #[arg(default_value = "quiz.md")]
    pub path: PathBuf,

    /// Interface language, overrides the quiz frontmatter
    #[arg(long, value_enum)]
    pub lang: Option<Lang>,

    /// Print the parsed quiz overview without entering the TUI
    #[arg(long)]
    pub summary: bool,
}

impl Cli {
    /// Command line first, then the quiz frontmatter, then English.
    pub fn resolve_lang(&self, frontmatter: Option<Lang>) -> Lang {
        self.lang.or(frontmatter).unwrap_or_default()
    }
}
