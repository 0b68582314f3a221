use std::collections::HashSet;
use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::error::QuizError;
use crate::model::*;

pub fn parse_quiz(content: &str) -> Result<Quiz, QuizError> {
    let (frontmatter, body) = split_frontmatter(content)?;
    let fm: Frontmatter = if frontmatter.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(&frontmatter)?
    };

    let (title, questions) = parse_body(&body)?;
    let title = fm.title.clone().unwrap_or(title);

    Ok(Quiz {
        frontmatter: fm,
        title,
        questions,
    })
}

fn split_frontmatter(content: &str) -> Result<(String, String), QuizError> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("---") {
        return Err(QuizError::MissingFrontmatter);
    }

    let after_first = &trimmed[3..];
    let end_pos = after_first
        .find("\n---")
        .ok_or(QuizError::UnclosedFrontmatter)?;

    let fm = after_first[..end_pos].trim().to_string();
    let body = after_first[end_pos + 4..].to_string();

    Ok((fm, body))
}

/// A question while its section is still being read.
struct Section {
    number: u32,
    title: String,
    is_multi: bool,
    text: String,
    answers: Vec<AnswerOption>,
    accepted: Vec<String>,
}

impl Section {
    fn push_block(&mut self, source: &str) {
        let source = source.trim_end();
        if source.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(source);
    }

    fn finish(self) -> Result<Question, QuizError> {
        let kind = match (self.answers.is_empty(), self.is_multi) {
            (false, true) => QuestionKind::Multiple,
            (false, false) => QuestionKind::Single,
            (true, true) => return Err(QuizError::MultiWithoutOptions(self.number)),
            (true, false) => QuestionKind::Text,
        };

        Ok(Question {
            id: QuestionId::for_number(self.number),
            number: self.number,
            title: self.title,
            kind,
            text: self.text,
            answers: self.answers,
            accepted: self.accepted,
        })
    }
}

/// Inline text gathered for the heading, list item or blockquote being read.
#[derive(Default)]
struct Collector {
    in_heading: bool,
    in_item: bool,
    in_quote: bool,
    heading: String,
    item: String,
    quote: String,
}

impl Collector {
    fn push(&mut self, text: &str) {
        if self.in_heading {
            self.heading.push_str(text);
        } else if self.in_item {
            self.item.push_str(text);
        } else if self.in_quote {
            self.quote.push_str(text);
        }
    }
}

fn parse_body(body: &str) -> Result<(String, Vec<Question>), QuizError> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_MATH);

    let mut title = String::new();
    let mut questions: Vec<Question> = Vec::new();
    let mut seen_numbers: HashSet<u32> = HashSet::new();
    let mut current: Option<Section> = None;

    let mut depth = 0usize;
    let mut block_range: Range<usize> = 0..0;
    let mut text = Collector::default();
    let mut item_checked: Option<bool> = None;
    let mut items: Vec<(String, Option<bool>)> = Vec::new();

    for (event, range) in Parser::new_ext(body, opts).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    block_range = range.clone();
                }
                depth += 1;
                match tag {
                    Tag::Heading { .. } if depth == 1 => {
                        text.in_heading = true;
                        text.heading.clear();
                    }
                    Tag::BlockQuote(_) => text.in_quote = true,
                    Tag::Item => {
                        text.in_item = true;
                        text.item.clear();
                        item_checked = None;
                    }
                    _ => {}
                }
            }
            Event::End(tag_end) => {
                depth = depth.saturating_sub(1);
                match &tag_end {
                    TagEnd::Item => {
                        text.in_item = false;
                        items.push((text.item.trim().to_string(), item_checked.take()));
                    }
                    TagEnd::Heading(_) if depth == 0 => text.in_heading = false,
                    _ => {}
                }

                if depth > 0 {
                    continue;
                }

                match tag_end {
                    TagEnd::Heading(HeadingLevel::H1) if current.is_none() => {
                        title = text.heading.trim().to_string();
                    }
                    TagEnd::Heading(HeadingLevel::H2) => {
                        if let Some(section) = current.take() {
                            questions.push(section.finish()?);
                        }
                        let (number, heading) = parse_h2_title(&text.heading)?;
                        if !seen_numbers.insert(number) {
                            return Err(QuizError::DuplicateQuestion(number));
                        }
                        current = Some(Section {
                            number,
                            title: heading.replace("(Multi)", "").trim().to_string(),
                            is_multi: heading.contains("(Multi)"),
                            text: String::new(),
                            answers: Vec::new(),
                            accepted: Vec::new(),
                        });
                    }
                    TagEnd::List(_) if !items.is_empty() && items.iter().all(|(_, c)| c.is_some()) => {
                        if let Some(section) = current.as_mut() {
                            section.answers.extend(items.drain(..).map(|(label, checked)| {
                                AnswerOption {
                                    text: label,
                                    correct: checked.unwrap_or(false),
                                }
                            }));
                        }
                    }
                    TagEnd::BlockQuote(_) if text.quote.trim_start().starts_with("accept:") => {
                        if let Some(section) = current.as_mut() {
                            section.accepted.extend(
                                text.quote
                                    .split("accept:")
                                    .map(|s| s.trim().to_string())
                                    .filter(|s| !s.is_empty()),
                            );
                        }
                    }
                    _ => {
                        if let Some(section) = current.as_mut() {
                            section.push_block(&body[block_range.clone()]);
                        }
                    }
                }

                items.clear();
                text.quote.clear();
                text.in_quote = false;
            }
            Event::Text(t) => text.push(&t),
            Event::Code(code) => text.push(&format!("`{}`", code)),
            Event::InlineMath(tex) => text.push(&format!("${}$", tex)),
            Event::SoftBreak | Event::HardBreak => text.push(" "),
            Event::TaskListMarker(checked) => item_checked = Some(checked),
            Event::Rule if depth == 0 => {
                if let Some(section) = current.as_mut() {
                    section.push_block(&body[range]);
                }
            }
            _ => {}
        }
    }

    if let Some(section) = current.take() {
        questions.push(section.finish()?);
    }

    Ok((title, questions))
}

fn parse_h2_title(text: &str) -> Result<(u32, String), QuizError> {
    let trimmed = text.trim();
    // Expected format: "1. Title text"
    let (num_str, title) = trimmed
        .split_once('.')
        .ok_or_else(|| QuizError::BadHeading(trimmed.to_string()))?;
    let number: u32 = num_str
        .trim()
        .parse()
        .map_err(|_| QuizError::BadHeading(trimmed.to_string()))?;
    Ok((number, title.trim().to_string()))
}
