//! `triage-links playwright [FILE|-] [--link]`

use triage_links::playwright::PlaywrightReport;
use triage_links::LinkedReport;

use crate::{read_input, CliBackend, CommandOutput};

pub fn run_playwright(args: &[String], backend: &dyn CliBackend) -> CommandOutput {
    let mut source = String::new();
    let mut link = false;
    for arg in args {
        match arg.as_str() {
            "--link" => link = true,
            other if other.starts_with("--") => {
                return CommandOutput::failure(2, &format!("unknown flag: {other}"))
            }
            other => {
                if !source.is_empty() {
                    return CommandOutput::failure(2, "playwright takes at most one report");
                }
                source = other.to_string();
            }
        }
    }

    let raw = match read_input(&source, backend) {
        Ok(raw) => raw,
        Err(message) => return CommandOutput::failure(1, &message),
    };
    let report = match PlaywrightReport::from_json(&raw) {
        Ok(report) => report,
        Err(err) => return CommandOutput::failure(1, &err.to_string()),
    };

    let failures = report.failures(backend.now_utc());
    let encoded = if link {
        let linked: Vec<LinkedReport> = failures.iter().map(|f| f.link()).collect();
        serde_json::to_string_pretty(&linked)
    } else {
        serde_json::to_string_pretty(&failures)
    };
    match encoded {
        Ok(body) => CommandOutput::ok(format!("{body}\n")),
        Err(err) => CommandOutput::failure(1, &format!("encode output: {err}")),
    }
}
