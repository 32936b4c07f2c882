//! `triage-links report [FILE|-] [--local] [--base PATH]`
//!
//! Accepts one failure report object or an array of them and prints the
//! derived links as JSON. `--local`/`--base` add the viewer-local script URL.

use serde::Serialize;
use triage_links::{FailureReport, LinkError, LinkedReport, PathMappingConfig};

use crate::remap::resolve_mapping;
use crate::{read_input, split_flag, take_value, CliBackend, CommandOutput, GlobalArgs};

#[derive(Debug, Serialize)]
struct ReportOutput {
    #[serde(flatten)]
    linked: LinkedReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_playwright_script: Option<String>,
}

pub fn run_report(args: &[String], global: &GlobalArgs, backend: &dyn CliBackend) -> CommandOutput {
    match execute_report(args, global, backend) {
        Ok(out) => out,
        Err((exit_code, message)) => CommandOutput::failure(exit_code, &message),
    }
}

fn execute_report(
    args: &[String],
    global: &GlobalArgs,
    backend: &dyn CliBackend,
) -> Result<CommandOutput, (i32, String)> {
    let mut source = String::new();
    let mut local = false;
    let mut base_flag = None;
    let mut idx = 0usize;
    while idx < args.len() {
        let (key, inline) = split_flag(&args[idx]);
        match key.as_str() {
            "--local" => local = true,
            "--base" => {
                let base = take_value(args, &mut idx, inline, "--base").map_err(|e| (2, e))?;
                base_flag = Some(base);
                local = true;
            }
            other if other.starts_with("--") => return Err((2, format!("unknown flag: {other}"))),
            other => {
                if !source.is_empty() {
                    return Err((2, "report takes at most one input".to_string()));
                }
                source = other.to_string();
            }
        }
        idx += 1;
    }

    let mapping = if local {
        Some(resolve_mapping(base_flag, global, backend)?)
    } else {
        None
    };

    let raw = read_input(&source, backend).map_err(|e| (1, e))?;
    let (reports, is_batch) = parse_reports(&raw).map_err(|err| (1, err.to_string()))?;
    let outputs: Vec<ReportOutput> = reports
        .iter()
        .map(|report| to_output(report, mapping.as_ref()))
        .collect();

    let encoded = match outputs.first() {
        Some(single) if !is_batch => serde_json::to_string_pretty(single),
        _ => serde_json::to_string_pretty(&outputs),
    };
    let body = encoded.map_err(|err| (1, format!("encode output: {err}")))?;

    Ok(CommandOutput::ok(format!("{body}\n")))
}

fn parse_reports(raw: &str) -> Result<(Vec<FailureReport>, bool), LinkError> {
    if raw.trim_start().starts_with('[') {
        let reports: Vec<FailureReport> =
            serde_json::from_str(raw).map_err(|err| LinkError::ReportParse(err.to_string()))?;
        return Ok((reports, true));
    }
    Ok((vec![FailureReport::from_json(raw)?], false))
}

fn to_output(report: &FailureReport, mapping: Option<&PathMappingConfig>) -> ReportOutput {
    let linked = report.link();
    let local_playwright_script = mapping.map(|m| linked.remapped(m).playwright_script);
    ReportOutput {
        linked,
        local_playwright_script,
    }
}
