use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    De,
}

const EN: &[(&str, &str)] = &[
    ("question-header", "Question {n} of {total}"),
    ("submit", "Submit"),
    ("answer-correct-title", "Correct"),
    ("answer-correct", "Well done, that answer is right."),
    ("answer-wrong-title", "Not quite"),
    ("answer-wrong", "That answer is wrong."),
    ("answer-pending-title", "Answer sent"),
    ("answer-pending", "Waiting for the result..."),
    ("continue", "Continue"),
    ("quiz-completed", "Quiz completed"),
    ("quiz-summary", "{total} questions answered, of which {correct} correct."),
    ("text-answer-placeholder", "Type your answer (markdown)"),
    ("confirm-quit", "Quit the quiz?"),
    ("confirm-quit-text", "Answers given so far are kept by the run."),
    ("confirm", "Confirm"),
    ("cancel", "Cancel"),
    ("help", "Key Bindings"),
    ("progress", "{answered} answered"),
    ("progress-correct", "{correct} correct"),
    ("progress-wrong", "{wrong} wrong"),
    ("elapsed", "{time} elapsed"),
    ("hint-continue", "continue"),
    ("hint-quit", "quit"),
    ("hint-confirm", "confirm"),
    ("hint-cancel", "cancel"),
    ("hint-close", "close"),
    ("hint-cursor", "cursor"),
    ("hint-newline", "newline"),
    ("hint-editor", "editor"),
    ("hint-submit", "submit"),
    ("hint-answer", "answer"),
    ("hint-move", "move"),
    ("hint-toggle", "toggle"),
    ("hint-scroll", "scroll"),
    ("hint-exit", "exit"),
];

const DE: &[(&str, &str)] = &[
    ("question-header", "Frage {n} von {total}"),
    ("submit", "Abschließen"),
    ("answer-correct-title", "Richtig"),
    ("answer-correct", "Gut gemacht, die Antwort ist richtig."),
    ("answer-wrong-title", "Leider falsch"),
    ("answer-wrong", "Die Antwort ist falsch."),
    ("answer-pending-title", "Antwort gesendet"),
    ("answer-pending", "Warte auf das Ergebnis..."),
    ("continue", "Weiter"),
    ("quiz-completed", "Quiz abgeschlossen"),
    ("quiz-summary", "{total} Fragen beantwortet. Davon {correct} richtige Antworten."),
    ("text-answer-placeholder", "Antwort eingeben (Markdown)"),
    ("confirm-quit", "Quiz beenden?"),
    ("confirm-quit-text", "Bisherige Antworten bleiben im Lauf erhalten."),
    ("confirm", "Bestätigen"),
    ("cancel", "Abbrechen"),
    ("help", "Tastenbelegung"),
    ("progress", "{answered} beantwortet"),
    ("progress-correct", "{correct} richtig"),
    ("progress-wrong", "{wrong} falsch"),
    ("elapsed", "{time} vergangen"),
    ("hint-continue", "weiter"),
    ("hint-quit", "beenden"),
    ("hint-confirm", "bestätigen"),
    ("hint-cancel", "abbrechen"),
    ("hint-close", "schließen"),
    ("hint-cursor", "Cursor"),
    ("hint-newline", "neue Zeile"),
    ("hint-editor", "Editor"),
    ("hint-submit", "abschicken"),
    ("hint-answer", "antworten"),
    ("hint-move", "bewegen"),
    ("hint-toggle", "umschalten"),
    ("hint-scroll", "blättern"),
    ("hint-exit", "verlassen"),
];

#[derive(Debug, Clone, Copy)]
pub struct Messages {
    lang: Lang,
}

impl Messages {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        let catalog = match self.lang {
            Lang::En => EN,
            Lang::De => DE,
        };
        lookup(catalog, key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }

    /// Looks up `key` and substitutes every `{name}` placeholder.
    pub fn format(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.get(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

fn lookup(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    catalog
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}
