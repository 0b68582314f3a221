use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

enum Token<'a> {
    Open(&'a str, &'a str),
    Close(&'a str),
    Text(&'a str),
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let Some(gt) = rest[lt..].find('>') else {
            tokens.push(Token::Text(&rest[lt..]));
            return tokens;
        };
        let inner = rest[lt + 1..lt + gt].trim();
        rest = &rest[lt + gt + 1..];

        if inner.starts_with('!') {
            continue;
        }
        if let Some(name) = inner.strip_prefix('/') {
            tokens.push(Token::Close(tag_name(name)));
        } else {
            let name = tag_name(inner);
            tokens.push(Token::Open(name, &inner[name.len()..]));
            if inner.ends_with('/') {
                tokens.push(Token::Close(name));
            }
        }
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    tokens
}

fn tag_name(inner: &str) -> &str {
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

fn attr<'a>(attrs: &'a str, key: &str) -> Option<&'a str> {
    let mut rest = attrs;
    while let Some(at) = rest.find(key) {
        let before_ok = rest[..at].ends_with(|c: char| c.is_whitespace()) || at == 0;
        let after = rest[at + key.len()..].trim_start();
        if before_ok {
            if let Some(value) = after.strip_prefix('=') {
                let value = value.trim_start();
                return match value.chars().next() {
                    Some(q @ ('"' | '\'')) => value[1..].split(q).next(),
                    _ => value.split_whitespace().next(),
                };
            }
        }
        rest = &rest[at + key.len()..];
    }
    None
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|s| s.content.is_empty())
}

/// MathML element being walked, with the number of child elements seen.
struct MathFrame<'a> {
    name: &'a str,
    children: usize,
}

#[derive(Default)]
struct LineWriter<'a> {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    math: Vec<MathFrame<'a>>,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_pre: bool,
}

impl<'a> LineWriter<'a> {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let next = f(self.style());
        self.styles.push(next);
    }

    fn text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let style = self.style();
        self.spans.push(Span::styled(text, style));
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().map_or(false, is_blank) {
            return;
        }
        self.lines.push(Line::default());
    }

    fn open_math(&mut self, name: &'a str) {
        if let Some(parent) = self.math.last_mut() {
            parent.children += 1;
            let separator = match (parent.name, parent.children) {
                ("msup" | "mover", 2) | ("msubsup" | "munderover", 3) => "^",
                ("msub" | "munder" | "msubsup" | "munderover", 2) => "_",
                ("mfrac", 2) => "/",
                _ => "",
            };
            self.text(separator);
        }
        match name {
            "msqrt" => self.text("√("),
            "mfrac" => self.text("("),
            _ => {}
        }
        self.math.push(MathFrame { name, children: 0 });
    }

    fn close_math(&mut self) {
        if let Some(frame) = self.math.pop() {
            if matches!(frame.name, "msqrt" | "mfrac") {
                self.text(")");
            }
            if frame.name == "math" {
                self.styles.pop();
            }
        }
    }

    fn open(&mut self, name: &'a str, attrs: &str) {
        if !self.math.is_empty() || name == "math" {
            if name == "math" && self.math.is_empty() {
                self.push_style(|s| s.fg(Color::LightMagenta));
            }
            self.open_math(name);
            return;
        }

        match name {
            "p" | "tr" => self.flush(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.push_style(|s| s.fg(Color::Cyan).add_modifier(Modifier::BOLD));
                self.text(format!("{} ", "#".repeat(level)));
            }
            "strong" | "b" => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            "em" | "i" => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            "del" | "s" => self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT)),
            "a" => self.push_style(|s| s.add_modifier(Modifier::UNDERLINED)),
            "code" => {
                if !self.in_pre {
                    self.push_style(|s| s.fg(Color::Yellow));
                }
            }
            "pre" => {
                self.flush();
                self.in_pre = true;
                self.push_style(|s| s.fg(Color::Green));
            }
            "blockquote" => {
                self.flush();
                self.quote_depth += 1;
            }
            "ul" => {
                self.flush();
                self.lists.push(None);
            }
            "ol" => {
                self.flush();
                let start = attr(attrs, "start").and_then(|v| v.parse().ok());
                self.lists.push(Some(start.unwrap_or(1)));
            }
            "li" => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().max(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}{}. ", indent, n);
                        *n += 1;
                        m
                    }
                    _ => format!("{}• ", indent),
                };
                self.spans.push(Span::raw(marker));
            }
            "td" | "th" => {}
            "br" => self.flush(),
            "hr" => {
                self.flush();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        if !self.math.is_empty() {
            self.close_math();
            return;
        }

        match name {
            "p" => self.blank(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.styles.pop();
                self.blank();
            }
            "strong" | "b" | "em" | "i" | "del" | "s" | "a" => {
                self.styles.pop();
            }
            "code" => {
                if !self.in_pre {
                    self.styles.pop();
                }
            }
            "pre" => {
                self.flush();
                self.in_pre = false;
                self.styles.pop();
                self.blank();
            }
            "blockquote" => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            "ul" | "ol" => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            "li" | "tr" => self.flush(),
            "td" | "th" if !self.spans.is_empty() => self.text(" │ "),
            "table" => self.blank(),
            _ => {}
        }
    }

    fn raw_text(&mut self, raw: &str) {
        let text = decode_entities(raw);
        if self.in_pre {
            let mut parts = text.split('\n').peekable();
            while let Some(part) = parts.next() {
                self.text(part);
                if parts.peek().is_some() {
                    self.flush();
                }
            }
            return;
        }
        if self.math.is_empty() && self.spans.is_empty() && text.trim().is_empty() {
            return;
        }
        self.text(text.replace('\n', " "));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().map_or(false, is_blank) {
            self.lines.pop();
        }
        let leading = self.lines.iter().take_while(|l| is_blank(l)).count();
        self.lines.split_off(leading)
    }
}

pub fn html_to_lines(html: &str) -> Vec<Line<'static>> {
    let mut writer = LineWriter::default();
    for token in tokenize(html) {
        match token {
            Token::Open(name, attrs) => writer.open(name, attrs),
            Token::Close(name) => writer.close(name),
            Token::Text(text) => writer.raw_text(text),
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let lines = html_to_lines("<p>one</p>\n<p>two &amp; three</p>\n");
        assert_eq!(plain(&lines), vec!["one", "", "two & three"]);
    }

    #[test]
    fn strong_text_is_bold() {
        let lines = html_to_lines("<p>a <strong>b</strong></p>");
        let bold = &lines[0].spans[1];
        assert_eq!(bold.content, "b");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn math_scripts_and_fractions_are_spelled_out() {
        let html = "<p>Area <math display=\"inline\"><msup><mi>r</mi><mn>2</mn></msup></math> \
                    and <math><mfrac><mn>1</mn><mi>n</mi></mfrac></math></p>";
        assert_eq!(plain(&html_to_lines(html)), vec!["Area r^2 and (1/n)"]);
    }

    #[test]
    fn ordered_list_items_are_numbered() {
        let lines = html_to_lines("<ol>\n<li>first</li>\n<li>second</li>\n</ol>\n");
        assert_eq!(plain(&lines), vec!["  1. first", "  2. second"]);
    }

    #[test]
    fn ordered_list_keeps_its_start_number() {
        let lines = html_to_lines("<ol start=\"3\">\n<li>three</li>\n<li>four</li>\n</ol>\n");
        assert_eq!(plain(&lines), vec!["  3. three", "  4. four"]);
    }

    #[test]
    fn rendered_list_continuation_is_not_renumbered() {
        let html = crate::render::render_markup("3. three\n4. four\n");
        assert_eq!(plain(&html_to_lines(&html)), vec!["  3. three", "  4. four"]);
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let lines = html_to_lines("<pre><code>let a = 1;\nlet b = 2;\n</code></pre>\n");
        assert_eq!(plain(&lines), vec!["let a = 1;", "let b = 2;"]);
    }
}
