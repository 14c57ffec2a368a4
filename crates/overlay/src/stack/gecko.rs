use super::{frame_at, StackLine, StackParser};

/// Parses `function@url:line:col` traces, which carry no summary line.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeckoStackParser;

impl StackParser for GeckoStackParser {
    fn name(&self) -> &'static str {
        "gecko"
    }

    fn parse(&self, trace: &str) -> Option<Vec<StackLine>> {
        let lines: Vec<StackLine> = trace
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split_once('@')
                    .and_then(|(function, location)| {
                        let function = (!function.is_empty()).then(|| function.to_string());
                        frame_at(function, location)
                    })
                    .map_or_else(|| StackLine::Raw(line.to_string()), StackLine::Frame)
            })
            .collect();

        lines
            .iter()
            .any(|line| matches!(line, StackLine::Frame(_)))
            .then_some(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gecko_frames() {
        let trace = "foo@http://x.com/test.js:130:32\n@http://x.com/app.js:10:5\n";
        let lines = GeckoStackParser.parse(trace).unwrap();
        assert_eq!(lines.len(), 2);
        let StackLine::Frame(first) = &lines[0] else {
            panic!("expected frame");
        };
        assert_eq!(first.function.as_deref(), Some("foo"));
        assert_eq!(first.file_name, "test.js:");
        let StackLine::Frame(second) = &lines[1] else {
            panic!("expected frame");
        };
        assert_eq!(second.function, None);
        assert_eq!(second.file_url, "http://x.com/app.js");
    }

    #[test]
    fn test_v8_trace_is_rejected() {
        let trace = "Error: boom\n    at foo (http://x.com/test.js:130:32)";
        assert_eq!(GeckoStackParser.parse(trace), None);
    }
}
