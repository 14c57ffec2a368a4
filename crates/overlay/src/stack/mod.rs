//! Stack trace parsing and formatting.
//!
//! Stack trace text is not standardized. Each known layout gets its own
//! [`StackParser`]; [`StackFormatter`] tries them in order and turns the first
//! successful parse into panel markup with one link per frame.

mod gecko;
mod v8;

pub use gecko::GeckoStackParser;
pub use v8::V8StackParser;

use dom::markup::{escape_html_attribute, escape_html_text};

/// Indentation in front of every formatted line.
pub const FRAME_INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Separator between formatted lines.
pub const LINE_BREAK: &str = "<br>";

/// One call site from a stack trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackFrame {
    pub function: Option<String>,
    /// Link text: the file name up to and including its first `:`.
    pub file_name: String,
    /// Location without line and column.
    pub file_url: String,
    pub line: u32,
    pub column: u32,
}

impl StackFrame {
    /// Full `url:line:column` location.
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file_url, self.line, self.column)
    }
}

/// A line of a parsed trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackLine {
    Frame(StackFrame),
    /// A line that did not match the layout, kept as text.
    Raw(String),
}

/// Parser for one stack trace layout.
pub trait StackParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Parse a whole trace. `None` means the trace is not in this layout.
    fn parse(&self, trace: &str) -> Option<Vec<StackLine>>;
}

/// Split `url:line:column` into its parts.
pub(crate) fn split_location(location: &str) -> Option<(String, u32, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let column = parts.next()?.parse().ok()?;
    let line = parts.next()?.parse().ok()?;
    let url = parts.next().filter(|url| !url.is_empty())?;
    Some((url.to_string(), line, column))
}

/// Link text for a location: the text after the last `/`, up to and
/// including the first `:`.
pub(crate) fn file_label(location: &str) -> String {
    let tail = location.rsplit('/').next().unwrap_or(location);
    let tail = tail.strip_suffix(')').unwrap_or(tail);
    match tail.find(':') {
        Some(colon) => tail[..=colon].to_string(),
        None => tail.to_string(),
    }
}

/// Build a frame from a location token, parenthesized or not.
pub(crate) fn frame_at(function: Option<String>, token: &str) -> Option<StackFrame> {
    let location = token.strip_prefix('(').unwrap_or(token);
    let location = location.strip_suffix(')').unwrap_or(location);
    let (file_url, line, column) = split_location(location)?;
    Some(StackFrame {
        function,
        file_name: file_label(location),
        file_url,
        line,
        column,
    })
}

/// Formats stack traces as panel markup.
pub struct StackFormatter {
    parsers: Vec<Box<dyn StackParser>>,
}

impl StackFormatter {
    /// A formatter with no parsers; every trace is unparseable.
    pub fn empty() -> Self {
        Self { parsers: Vec::new() }
    }

    /// Add a parser, tried after the existing ones.
    pub fn with_parser(mut self, parser: impl StackParser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn parser_names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Parse with the first parser that accepts the trace.
    pub fn parse(&self, trace: &str) -> Option<Vec<StackLine>> {
        for parser in &self.parsers {
            if let Some(lines) = parser.parse(trace) {
                tracing::trace!(parser = parser.name(), lines = lines.len(), "stack parsed");
                return Some(lines);
            }
        }
        tracing::warn!("no parser accepted stack trace");
        None
    }

    /// Markup for a trace, or `None` if no parser accepts it.
    pub fn format(&self, trace: &str) -> Option<String> {
        self.parse(trace).map(|lines| render_lines(&lines))
    }
}

impl Default for StackFormatter {
    fn default() -> Self {
        Self::empty()
            .with_parser(V8StackParser)
            .with_parser(GeckoStackParser)
    }
}

/// Render parsed lines, joined with `<br>`.
pub fn render_lines(lines: &[StackLine]) -> String {
    lines
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn render_line(line: &StackLine) -> String {
    match line {
        StackLine::Frame(frame) => {
            let mut out = String::from(FRAME_INDENT);
            if let Some(function) = &frame.function {
                out.push_str(&escape_html_text(function));
                out.push(' ');
            }
            out.push_str(&format!(
                r#"<a href="{}" title="{}">{}</a>"#,
                escape_html_attribute(&frame.file_url),
                escape_html_attribute(&frame.location()),
                escape_html_text(&frame.file_name),
            ));
            out
        }
        StackLine::Raw(text) => format!("{FRAME_INDENT}{}", escape_html_text(text)),
    }
}
