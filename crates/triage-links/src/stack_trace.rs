//! Locate the failing source line in a stack trace.
//!
//! Failure reports do not always carry an explicit error line, but their
//! stack traces do: `at demo.spec.js:14:5`, `at fn (/abs/path.js:14:5)`, or a
//! Python `File "x.py", line 14, in fn` frame. The first frame that points
//! into the reported script supplies the line anchor.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

struct FramePatterns {
    node: Option<Regex>,
    python: Option<Regex>,
    bare: Option<Regex>,
}

fn patterns() -> &'static FramePatterns {
    static PATTERNS: OnceLock<FramePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FramePatterns {
        node: compile(
            r"^\s*at\s+(?:(?P<func>.+?)\s+\()?(?P<file>[^\s()]+?):(?P<line>\d+)(?::(?P<col>\d+))?\)?\s*$",
        ),
        python: compile(
            r#"^\s*File\s+"(?P<file>[^"]+)",\s+line\s+(?P<line>\d+)(?:,\s+in\s+(?P<func>\S+))?"#,
        ),
        bare: compile(r#"(?P<file>[^\s()'"]+\.[A-Za-z0-9]+):(?P<line>\d+)(?::(?P<col>\d+))?"#),
    })
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(error = %err, "skipping stack frame pattern");
            None
        }
    }
}

/// Parse one stack-trace line into a frame.
pub fn parse_frame(line: &str) -> Option<StackFrame> {
    let pats = patterns();
    [&pats.node, &pats.python, &pats.bare]
        .into_iter()
        .flatten()
        .find_map(|re| re.captures(line).and_then(|caps| frame_from(&caps)))
}

/// Every recognizable frame in `stack`, top first.
pub fn frames(stack: &str) -> Vec<StackFrame> {
    stack.lines().filter_map(parse_frame).collect()
}

/// Line of the first frame that points at `file_path` (compared by file
/// name). With an empty `file_path`, the first frame outside `node_modules`.
pub fn error_line_for(stack: &str, file_path: &str) -> Option<i64> {
    if stack.trim().is_empty() {
        return None;
    }
    let target = file_name(file_path);
    let frame = frames(stack).into_iter().find(|frame| {
        if target.is_empty() {
            !frame.file.contains("node_modules")
        } else {
            file_name(&frame.file) == target
        }
    });
    match frame {
        Some(frame) if frame.line > 0 => Some(i64::from(frame.line)),
        _ => {
            debug!(file = %file_path, "no stack frame points at reported file");
            None
        }
    }
}

fn frame_from(caps: &Captures<'_>) -> Option<StackFrame> {
    let file = caps.name("file")?.as_str().to_string();
    let line = caps.name("line")?.as_str().parse::<u32>().ok()?;
    let column = caps
        .name("col")
        .and_then(|m| m.as_str().parse::<u32>().ok());
    let function = caps
        .name("func")
        .map(|m| m.as_str().trim().to_string())
        .filter(|f| !f.is_empty());
    Some(StackFrame {
        file,
        line,
        column,
        function,
    })
}

fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
}
