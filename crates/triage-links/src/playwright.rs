//! Failure reports from a Playwright `--reporter=json` report.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::LinkError;
use crate::report::FailureReport;

const FAILED_STATUSES: [&str; 2] = ["failed", "timedOut"];
const DEFAULT_FILE: &str = "unknown.spec.js";
const DEFAULT_TITLE: &str = "Unknown Test";
const DEFAULT_ERROR: &str = "Test failed";
const REPORT_LABELS: [&str; 3] = ["playwright", "automated", "ui"];

#[derive(Debug, Default, Deserialize)]
pub struct PlaywrightReport {
    #[serde(default)]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub specs: Vec<Spec>,
    #[serde(default)]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub tests: Vec<SpecTest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpecTest {
    #[serde(default)]
    pub results: Vec<TestResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub error: Option<TestError>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stack: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub error: Option<TestError>,
}

impl PlaywrightReport {
    pub fn from_json(raw: &str) -> Result<Self, LinkError> {
        serde_json::from_str(raw).map_err(|err| LinkError::PlaywrightParse(err.to_string()))
    }

    /// One [`FailureReport`] per failed or timed-out result, in report order.
    /// `now` stamps the synthesized log text.
    pub fn failures(&self, now: DateTime<Utc>) -> Vec<FailureReport> {
        let mut out = Vec::new();
        for suite in &self.suites {
            collect_failures(suite, now, &mut out);
        }
        debug!(count = out.len(), "collected playwright failures");
        out
    }
}

fn collect_failures(suite: &Suite, now: DateTime<Utc>, out: &mut Vec<FailureReport>) {
    for spec in &suite.specs {
        for test in &spec.tests {
            for result in &test.results {
                if FAILED_STATUSES.contains(&result.status.as_str()) {
                    out.push(failure_from(spec, result, now));
                }
            }
        }
    }
    for child in &suite.suites {
        collect_failures(child, now, out);
    }
}

fn failure_from(spec: &Spec, result: &TestResult, now: DateTime<Utc>) -> FailureReport {
    let test_name = if spec.title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        spec.title.clone()
    };
    let file_path = spec
        .file
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILE)
        .to_string();

    let (error_message, stack_trace) = match &result.error {
        Some(err) => (
            if err.message.is_empty() {
                DEFAULT_ERROR.to_string()
            } else {
                err.message.clone()
            },
            err.stack.clone(),
        ),
        None => (DEFAULT_ERROR.to_string(), String::new()),
    };

    FailureReport {
        logs: build_logs(&test_name, result, &error_message, now),
        test_name,
        file_path,
        error_message,
        stack_trace,
        labels: REPORT_LABELS.iter().map(|l| (*l).to_string()).collect(),
        ..FailureReport::default()
    }
}

fn build_logs(test_name: &str, result: &TestResult, error_message: &str, now: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!("[{}] Test: {test_name}", now.format("%Y-%m-%d %H:%M:%S")),
        format!("Status: {}", result.status),
        format!("Duration: {}ms", result.duration),
        format!("Error: {error_message}"),
    ];
    for step in &result.steps {
        if !step.title.is_empty() {
            lines.push(format!("  Step: {}", step.title));
        }
        if let Some(err) = step.error.as_ref().filter(|e| !e.message.is_empty()) {
            lines.push(format!("    Error: {}", err.message));
        }
    }
    lines.join("\n")
}
