//! Failure reports in, clickable links out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LinkError;
use crate::file_url::to_file_url;
use crate::line_anchor::with_line;
use crate::log_url::extract_url;
use crate::remote_map::PathMappingConfig;
use crate::stack_trace::error_line_for;

/// A script path plus an optional failing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    raw_path: String,
    line: Option<i64>,
}

impl FileReference {
    pub fn new(raw_path: impl Into<String>, line: Option<i64>) -> Self {
        Self {
            raw_path: raw_path.into(),
            line,
        }
    }

    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn line(&self) -> Option<i64> {
        self.line
    }

    /// `file://` URL for the path, anchored at the line when it is positive.
    pub fn clickable_url(&self) -> String {
        if self.raw_path.is_empty() {
            return String::new();
        }
        with_line(&to_file_url(&self.raw_path), self.line)
    }
}

/// An incoming test-failure report. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub stack_trace: String,
    #[serde(default)]
    pub logs: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_url: Option<String>,
    /// Script URL the reporter already built on its own machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playwright_script_url: Option<String>,
}

/// Links derived from one [`FailureReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedReport {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub playwright_script: String,
    #[serde(default)]
    pub test_url: Option<String>,
    #[serde(default)]
    pub error_line: Option<i64>,
}

impl FailureReport {
    pub fn from_json(raw: &str) -> Result<Self, LinkError> {
        serde_json::from_str(raw).map_err(|err| LinkError::ReportParse(err.to_string()))
    }

    /// The failing line: an explicit positive `error_line`, otherwise the
    /// first stack frame pointing into `file_path`.
    pub fn resolved_error_line(&self) -> Option<i64> {
        match self.error_line {
            Some(line) if line > 0 => Some(line),
            _ => error_line_for(&self.stack_trace, &self.file_path),
        }
    }

    pub fn file_reference(&self) -> FileReference {
        FileReference::new(self.file_path.clone(), self.resolved_error_line())
    }

    /// Page URL under test: the reporter's own value when present, otherwise
    /// recovered from the logs, then from the error message.
    pub fn resolved_test_url(&self) -> Option<String> {
        if let Some(url) = non_blank(self.test_url.as_deref()) {
            return Some(url.to_string());
        }
        extract_url(&self.logs).or_else(|| extract_url(&self.error_message))
    }

    pub fn link(&self) -> LinkedReport {
        let error_line = self.resolved_error_line();
        let playwright_script = match non_blank(self.playwright_script_url.as_deref()) {
            Some(url) => url.to_string(),
            None => FileReference::new(self.file_path.clone(), error_line).clickable_url(),
        };
        debug!(
            test = %self.test_name,
            script = %playwright_script,
            line = ?error_line,
            "linked failure report"
        );
        LinkedReport {
            test_name: self.test_name.clone(),
            playwright_script,
            test_url: self.resolved_test_url(),
            error_line,
        }
    }
}

impl LinkedReport {
    /// Copy with the script URL re-rooted onto the viewer's checkout.
    pub fn remapped(&self, mapping: &PathMappingConfig) -> Self {
        Self {
            playwright_script: mapping.remap(&self.playwright_script),
            ..self.clone()
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{FailureReport, FileReference};
    use crate::remote_map::PathMappingConfig;

    fn demo_report() -> FailureReport {
        FailureReport {
            test_name: "should display correct page title".to_string(),
            file_path: "/srv/bug-triage-engine/demo.spec.js".to_string(),
            error_message: "expect(page).toHaveTitle(expected)".to_string(),
            stack_trace: "    at demo.spec.js:14:5\n    at WorkerRunner._runTestWithBeforeHooks (/node_modules/@playwright/test/lib/worker/workerRunner.js:471:7)".to_string(),
            logs: "[2025-12-13 15:30:15] INFO: Starting test\n[2025-12-13 15:30:16] DEBUG: Navigating to https://demo.playwright.dev/todomvc\n[2025-12-13 15:30:17] ERROR: Title assertion failed".to_string(),
            ..FailureReport::default()
        }
    }

    #[test]
    fn file_reference_builds_anchored_url() {
        let reference = FileReference::new("C:\\qa\\login.spec.js", Some(9));
        assert_eq!(reference.clickable_url(), "file:///C:/qa/login.spec.js#L9");
        assert_eq!(FileReference::new("", Some(9)).clickable_url(), "");
    }

    #[test]
    fn link_derives_line_and_test_url() {
        let linked = demo_report().link();
        assert_eq!(
            linked.playwright_script,
            "file:///srv/bug-triage-engine/demo.spec.js#L14"
        );
        assert_eq!(linked.error_line, Some(14));
        assert_eq!(
            linked.test_url.as_deref(),
            Some("https://demo.playwright.dev/todomvc")
        );
    }

    #[test]
    fn explicit_fields_win_over_derived_ones() {
        let report = FailureReport {
            error_line: Some(20),
            test_url: Some("https://example.com".to_string()),
            playwright_script_url: Some("file:///C:/qa-tests/test.spec.js#L10".to_string()),
            ..demo_report()
        };
        let linked = report.link();
        assert_eq!(linked.playwright_script, "file:///C:/qa-tests/test.spec.js#L10");
        assert_eq!(linked.test_url.as_deref(), Some("https://example.com"));
        assert_eq!(linked.error_line, Some(20));
    }

    #[test]
    fn blank_or_non_positive_fields_fall_back() {
        let report = FailureReport {
            error_line: Some(0),
            test_url: Some("   ".to_string()),
            playwright_script_url: Some(String::new()),
            ..demo_report()
        };
        let linked = report.link();
        assert_eq!(linked.error_line, Some(14));
        assert!(linked.playwright_script.ends_with("/demo.spec.js#L14"));
        assert_eq!(
            linked.test_url.as_deref(),
            Some("https://demo.playwright.dev/todomvc")
        );
    }

    #[test]
    fn empty_report_links_to_nothing() {
        let linked = FailureReport::default().link();
        assert_eq!(linked.playwright_script, "");
        assert_eq!(linked.test_url, None);
        assert_eq!(linked.error_line, None);
    }

    #[test]
    fn test_url_falls_back_to_error_message() {
        let report = FailureReport {
            logs: "no urls logged".to_string(),
            error_message: "page.goto: net::ERR_CONNECTION_REFUSED at http://localhost:3000/login".to_string(),
            ..FailureReport::default()
        };
        assert_eq!(
            report.resolved_test_url().as_deref(),
            Some("http://localhost:3000/login")
        );
    }

    #[test]
    fn from_json_accepts_partial_reports_and_rejects_garbage() {
        let report = match FailureReport::from_json(
            r#"{"test_name":"t","file_path":"test.spec.js","stack_trace":"at test.spec.js:10:5","llm_model":"ignored"}"#,
        ) {
            Ok(report) => report,
            Err(err) => panic!("parse: {err}"),
        };
        assert_eq!(report.resolved_error_line(), Some(10));
        assert!(FailureReport::from_json("{not json").is_err());
    }

    #[test]
    fn remapped_only_touches_script_url() {
        let linked = demo_report().link();
        let local = linked.remapped(&PathMappingConfig::new("C:/mine"));
        assert_eq!(local.playwright_script, "file:///C:/mine/demo.spec.js#L14");
        assert_eq!(local.test_url, linked.test_url);
        assert_eq!(local.error_line, linked.error_line);
    }
}
