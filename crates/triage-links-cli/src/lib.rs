//! triage-links-cli: command-line surface for triage-links.

use std::io::Read;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

pub mod config;
pub mod extract;
pub mod link;
pub mod playwright;
pub mod remap;
pub mod report;

#[cfg(test)]
pub(crate) mod tests_common;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "triage-links-cli"
}

static VERSION: OnceLock<String> = OnceLock::new();

/// Set the version string for `--version` output.
pub fn set_version(version: &str) {
    let _ = VERSION.set(version.to_string());
}

fn get_version() -> &'static str {
    VERSION.get().map(|s| s.as_str()).unwrap_or("dev")
}

/// Captured result of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn ok(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32, message: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Error: {message}\n"),
            exit_code,
        }
    }
}

/// Process-facing inputs a command may need.
pub trait CliBackend {
    fn read_stdin(&self) -> Result<String, String>;
    fn read_file(&self, path: &str) -> Result<String, String>;
    fn env_var(&self, key: &str) -> Option<String>;
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Backend over the real process: stdin, filesystem, environment, clock.
pub struct ProcessBackend;

impl CliBackend for ProcessBackend {
    fn read_stdin(&self) -> Result<String, String> {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| format!("read stdin: {err}"))?;
        Ok(buf)
    }

    fn read_file(&self, path: &str) -> Result<String, String> {
        std::fs::read_to_string(path).map_err(|err| format!("read {path}: {err}"))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Read `source` (a path, or `-`/empty for stdin) through the backend.
pub(crate) fn read_input(source: &str, backend: &dyn CliBackend) -> Result<String, String> {
    if source.is_empty() || source == "-" {
        backend.read_stdin()
    } else {
        backend.read_file(source)
    }
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    pub config_file: Option<String>,
}

fn help_text() -> String {
    "\
triage-links turns test-failure reports into clickable source links.

Usage:
  triage-links [--config FILE] [command]

Available Commands:
  extract-url  Recover the page-under-test URL from log text
  help         Help about any command
  link         Build a file:// URL for a script path, optionally anchored at a line
  playwright   List failing results of a Playwright JSON report as failure reports
  remap        Re-root a remote file:// URL onto the local checkout
  report       Derive links for a failure report (JSON)

Flags:
      --config string   config file (default is $HOME/.config/triage-links/config.yaml)
  -h, --help            help for triage-links
  -v, --version         version for triage-links

Environment:
  TRIAGE_LOCAL_BASE_PATH   local checkout root used by remap and report --local
  RUST_LOG                 log filter for stderr diagnostics (overrides logging.level)\n"
        .to_string()
}

/// Filter directive for the stderr subscriber: `RUST_LOG` wins over the
/// config's `logging.level`. A config that fails to load falls back to the
/// default level; the command itself reports that error.
pub fn log_filter(args: &[String], backend: &dyn CliBackend) -> String {
    if let Some(filter) = backend.env_var("RUST_LOG").filter(|f| !f.trim().is_empty()) {
        return filter;
    }
    let config_file = parse_global_args(args)
        .ok()
        .and_then(|(global, _)| global.config_file);
    match config::load_config(config_file.as_deref(), backend) {
        Ok((cfg, _)) => cfg.logging.level,
        Err(_) => config::DEFAULT_LOG_LEVEL.to_string(),
    }
}

pub fn run_cli_for_test(args: &[&str], backend: &dyn CliBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    run_cli(&owned, backend)
}

pub fn run_cli(args: &[String], backend: &dyn CliBackend) -> CommandOutput {
    let (global, rest) = match parse_global_args(args) {
        Ok(value) => value,
        Err(message) => return CommandOutput::failure(2, &message),
    };

    let Some((cmd, rest)) = rest.split_first() else {
        return CommandOutput::ok(help_text());
    };

    match cmd.as_str() {
        "--help" | "-h" | "help" => CommandOutput::ok(help_text()),
        "--version" | "-v" => CommandOutput::ok(format!("triage-links version {}\n", get_version())),
        "link" => link::run_link(rest),
        "extract-url" => extract::run_extract(rest, backend),
        "remap" => remap::run_remap(rest, &global, backend),
        "report" => report::run_report(rest, &global, backend),
        "playwright" => playwright::run_playwright(rest, backend),
        other => CommandOutput::failure(
            1,
            &format!("unknown command \"{other}\" for \"triage-links\""),
        ),
    }
}

fn parse_global_args(args: &[String]) -> Result<(GlobalArgs, &[String]), String> {
    let mut global = GlobalArgs::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let token = args[idx].as_str();
        if let Some(value) = token.strip_prefix("--config=") {
            global.config_file = Some(value.to_string());
        } else if token == "--config" {
            idx += 1;
            let value = args
                .get(idx)
                .ok_or_else(|| "missing value for --config".to_string())?;
            global.config_file = Some(value.clone());
        } else {
            break;
        }
        idx += 1;
    }
    Ok((global, &args[idx..]))
}

/// Value of a `--flag value` / `--flag=value` pair at `argv[*idx]`.
pub(crate) fn take_value(
    argv: &[String],
    idx: &mut usize,
    inline: Option<String>,
    flag: &str,
) -> Result<String, String> {
    if let Some(value) = inline {
        return Ok(value);
    }
    *idx += 1;
    argv.get(*idx)
        .cloned()
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub(crate) fn split_flag(token: &str) -> (String, Option<String>) {
    match token.split_once('=') {
        Some((k, v)) if k.starts_with("--") => (k.to_string(), Some(v.to_string())),
        _ => (token.to_string(), None),
    }
}
