//! `triage-links link <path> [--line N] [--check]`

use triage_links::{file_exists, FileReference};

use crate::{split_flag, take_value, CommandOutput};

#[derive(Debug, Default, PartialEq, Eq)]
struct LinkArgs {
    path: String,
    line: Option<i64>,
    check: bool,
}

pub fn run_link(args: &[String]) -> CommandOutput {
    let parsed = match parse_link_args(args) {
        Ok(parsed) => parsed,
        Err(message) => return CommandOutput::failure(2, &message),
    };

    let reference = FileReference::new(parsed.path, parsed.line);
    let mut out = CommandOutput::ok(format!("{}\n", reference.clickable_url()));
    if parsed.check && !file_exists(reference.raw_path()) {
        out.stderr = format!("warning: {} is not a readable file here\n", reference.raw_path());
    }
    out
}

fn parse_link_args(args: &[String]) -> Result<LinkArgs, String> {
    let mut out = LinkArgs::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let (key, inline) = split_flag(&args[idx]);
        match key.as_str() {
            "--line" | "-l" => {
                let raw = take_value(args, &mut idx, inline, "--line")?;
                let line = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid --line: {raw:?}"))?;
                out.line = Some(line);
            }
            "--check" => out.check = true,
            other if other.starts_with("--") => return Err(format!("unknown flag: {other}")),
            _ => {
                if !out.path.is_empty() {
                    return Err("link takes exactly one path".to_string());
                }
                out.path = args[idx].clone();
            }
        }
        idx += 1;
    }
    if out.path.is_empty() {
        return Err("usage: triage-links link <path> [--line N] [--check]".to_string());
    }
    Ok(out)
}
