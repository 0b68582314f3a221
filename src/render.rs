//! Markdown with math to sanitized HTML, rendered off the UI thread.

use std::collections::{HashMap, HashSet};
use std::panic;
use std::sync::mpsc;
use std::thread;

use latex2mathml::{latex_to_mathml, DisplayStyle};
use pulldown_cmark::{html, CowStr, Event, Options, Parser};

const HTML_TAGS: &[&str] = &[
    "p", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "em", "strong", "del", "code", "pre",
    "blockquote", "ul", "ol", "li", "a", "table", "thead", "tbody", "tr", "th", "td", "span",
];

const MATHML_TAGS: &[&str] = &[
    "math", "semantics", "annotation", "mrow", "mi", "mn", "mo", "ms", "mtext", "mspace",
    "mfrac", "msqrt", "mroot", "msub", "msup", "msubsup", "munder", "mover", "munderover",
    "mtable", "mtr", "mtd", "mstyle", "mpadded", "mphantom", "menclose",
];

#[must_use]
pub fn render_markup(text: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_MATH);

    let parser = Parser::new_ext(text, opts).map(typeset_math);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    sanitize_html(&out)
}

fn typeset_math(event: Event<'_>) -> Event<'_> {
    match event {
        Event::InlineMath(tex) => typeset(tex, DisplayStyle::Inline, "$"),
        Event::DisplayMath(tex) => typeset(tex, DisplayStyle::Block, "$$"),
        other => other,
    }
}

/// Malformed math stays in the output as its literal source.
fn typeset<'a>(tex: CowStr<'a>, style: DisplayStyle, delimiter: &str) -> Event<'a> {
    match latex_to_mathml(&tex, style) {
        Ok(mathml) => Event::InlineHtml(mathml.into()),
        Err(e) => {
            log::debug!("leaving math {:?} as text: {:?}", tex, e);
            Event::Text(format!("{}{}{}", delimiter, &*tex, delimiter).into())
        }
    }
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = HTML_TAGS.iter().chain(MATHML_TAGS).copied().collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href", "title"].into_iter().collect());
    attributes.insert("ol", ["start"].into_iter().collect());
    attributes.insert("math", ["display"].into_iter().collect());
    attributes.insert("mi", ["mathvariant"].into_iter().collect());
    attributes.insert(
        "mo",
        ["stretchy", "fence", "separator", "lspace", "rspace", "form"]
            .into_iter()
            .collect(),
    );
    attributes.insert("mstyle", ["displaystyle", "scriptlevel"].into_iter().collect());
    attributes.insert("mspace", ["width"].into_iter().collect());
    attributes.insert("mfrac", ["linethickness"].into_iter().collect());
    attributes.insert("annotation", ["encoding"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub generation: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDone {
    pub generation: u64,
    pub html: String,
}

/// Last committed markup for the question on screen.
#[derive(Debug, Default)]
pub struct RenderCache {
    generation: u64,
    committed: u64,
    requested: Option<String>,
    html: String,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a job to dispatch when `text` differs from the last request.
    pub fn request(&mut self, text: &str) -> Option<RenderJob> {
        if self.requested.as_deref() == Some(text) {
            return None;
        }
        self.generation += 1;
        self.requested = Some(text.to_string());
        Some(RenderJob {
            generation: self.generation,
            text: text.to_string(),
        })
    }

    /// Stores `done` if it answers the latest request. Returns whether it did.
    pub fn commit(&mut self, done: RenderDone) -> bool {
        if done.generation != self.generation {
            log::debug!(
                "dropping stale render {} (latest is {})",
                done.generation,
                self.generation
            );
            return false;
        }
        self.committed = done.generation;
        self.html = done.html;
        true
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_pending(&self) -> bool {
        self.committed != self.generation
    }
}

/// Handle to the background render thread.
pub struct RenderWorker {
    jobs: mpsc::Sender<RenderJob>,
}

impl RenderWorker {
    pub fn spawn() -> (Self, mpsc::Receiver<RenderDone>) {
        let (job_tx, job_rx) = mpsc::channel::<RenderJob>();
        let (done_tx, done_rx) = mpsc::channel::<RenderDone>();

        thread::spawn(move || {
            for job in job_rx {
                let text = job.text;
                match panic::catch_unwind(|| render_markup(&text)) {
                    Ok(html) => {
                        let done = RenderDone {
                            generation: job.generation,
                            html,
                        };
                        if done_tx.send(done).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        log::warn!(
                            "render {} failed, keeping previous markup",
                            job.generation
                        );
                    }
                }
            }
        });

        (Self { jobs: job_tx }, done_rx)
    }

    pub fn dispatch(&self, job: RenderJob) {
        if self.jobs.send(job).is_err() {
            log::warn!("render worker is gone, question markup will not update");
        }
    }
}
