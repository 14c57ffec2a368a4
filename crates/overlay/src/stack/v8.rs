use super::{frame_at, StackLine, StackParser};

/// Parses `at function (url:line:col)` and `at url:line:col` traces.
///
/// The first line is the error summary and is dropped. A line of exactly
/// three tokens names a function; any other count is taken as a bare
/// location. Lines that do not fit are kept raw.
#[derive(Clone, Copy, Debug, Default)]
pub struct V8StackParser;

impl V8StackParser {
    fn parse_line(line: &str) -> StackLine {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (Some(&"at"), Some(location)) = (tokens.first(), tokens.last()) else {
            return StackLine::Raw(line.to_string());
        };
        let function = (tokens.len() == 3).then(|| tokens[1].to_string());
        match frame_at(function, location) {
            Some(frame) => StackLine::Frame(frame),
            None => StackLine::Raw(line.to_string()),
        }
    }
}

impl StackParser for V8StackParser {
    fn name(&self) -> &'static str {
        "v8"
    }

    fn parse(&self, trace: &str) -> Option<Vec<StackLine>> {
        let lines: Vec<StackLine> = trace
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Self::parse_line)
            .collect();

        lines
            .iter()
            .any(|line| matches!(line, StackLine::Frame(_)))
            .then_some(lines)
    }
}
