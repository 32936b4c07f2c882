//! `triage-links remap [URL...] [--base PATH]`
//!
//! With no URL arguments, remaps every non-empty stdin line.

use triage_links::PathMappingConfig;

use crate::config::load_config;
use crate::{split_flag, take_value, CliBackend, CommandOutput, GlobalArgs};

pub fn run_remap(args: &[String], global: &GlobalArgs, backend: &dyn CliBackend) -> CommandOutput {
    match execute_remap(args, global, backend) {
        Ok(out) => out,
        Err((exit_code, message)) => CommandOutput::failure(exit_code, &message),
    }
}

fn execute_remap(
    args: &[String],
    global: &GlobalArgs,
    backend: &dyn CliBackend,
) -> Result<CommandOutput, (i32, String)> {
    let mut base_flag = None;
    let mut urls = Vec::new();
    let mut idx = 0usize;
    while idx < args.len() {
        let (key, inline) = split_flag(&args[idx]);
        match key.as_str() {
            "--base" => {
                base_flag = Some(take_value(args, &mut idx, inline, "--base").map_err(|e| (2, e))?);
            }
            other if other.starts_with("--") => return Err((2, format!("unknown flag: {other}"))),
            _ => urls.push(args[idx].clone()),
        }
        idx += 1;
    }

    let mapping = resolve_mapping(base_flag, global, backend)?;

    if urls.is_empty() {
        let text = backend.read_stdin().map_err(|e| (1, e))?;
        urls = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut out = String::new();
    for url in &urls {
        out.push_str(&mapping.remap(url));
        out.push('\n');
    }
    Ok(CommandOutput::ok(out))
}

/// An explicit `--base` wins; otherwise the loaded config supplies the base.
pub(crate) fn resolve_mapping(
    base_flag: Option<String>,
    global: &GlobalArgs,
    backend: &dyn CliBackend,
) -> Result<PathMappingConfig, (i32, String)> {
    if let Some(base) = base_flag.filter(|b| !b.trim().is_empty()) {
        return Ok(PathMappingConfig::new(base.trim()));
    }
    let (cfg, _) = load_config(global.config_file.as_deref(), backend)
        .map_err(|err| (1, err.to_string()))?;
    if cfg.mapping.local_base_path.trim().is_empty() {
        return Err((
            2,
            "local base path is not configured (use --base, TRIAGE_LOCAL_BASE_PATH, or mapping.local_base_path)"
                .to_string(),
        ));
    }
    Ok(cfg.mapping)
}

#[cfg(test)]
mod tests {
    use super::run_remap;
    use crate::config::LOCAL_BASE_PATH_ENV;
    use crate::tests_common::MockBackend;
    use crate::GlobalArgs;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| (*a).to_string()).collect()
    }

    #[test]
    fn remap_with_base_flag() {
        let out = run_remap(
            &argv(&["file:///C:/their/tests/login.spec.js#L14", "--base", "C:/mine"]),
            &GlobalArgs::default(),
            &MockBackend::default(),
        );
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "file:///C:/mine/login.spec.js#L14\n");
    }

    #[test]
    fn remap_uses_environment_and_stdin_lines() {
        let backend = MockBackend::with_stdin(
            "file:///C:/qa-tests/test.spec.js#L10\n\nhttps://demo.playwright.dev/todomvc\n",
        )
        .with_env(LOCAL_BASE_PATH_ENV, "/home/me/tests");
        let out = run_remap(&[], &GlobalArgs::default(), &backend);
        assert_eq!(out.exit_code, 0);
        assert_eq!(
            out.stdout,
            "file:///home/me/tests/test.spec.js#L10\nhttps://demo.playwright.dev/todomvc\n"
        );
    }

    #[test]
    fn remap_without_base_is_a_usage_error() {
        let out = run_remap(&argv(&["file:///a.js"]), &GlobalArgs::default(), &MockBackend::default());
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("local base path is not configured"));
    }

    #[test]
    fn remap_reads_base_from_explicit_config() {
        let backend = MockBackend::default()
            .with_file("/etc/tl.yaml", "mapping:\n  local_base_path: D:/checkout\n");
        let global = GlobalArgs {
            config_file: Some("/etc/tl.yaml".to_string()),
        };
        let out = run_remap(&argv(&["file:///ci/x/a.spec.ts#L2"]), &global, &backend);
        assert_eq!(out.stdout, "file:///D:/checkout/a.spec.ts#L2\n");
    }
}
