//! `triage-links extract-url [FILE|-] [--json]`

use triage_links::extract_url_ranked;

use crate::{read_input, CliBackend, CommandOutput};

pub fn run_extract(args: &[String], backend: &dyn CliBackend) -> CommandOutput {
    let mut source = String::new();
    let mut json = false;
    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            other if other.starts_with("--") => {
                return CommandOutput::failure(2, &format!("unknown flag: {other}"))
            }
            other => {
                if !source.is_empty() {
                    return CommandOutput::failure(2, "extract-url takes at most one input");
                }
                source = other.to_string();
            }
        }
    }

    let text = match read_input(&source, backend) {
        Ok(text) => text,
        Err(message) => return CommandOutput::failure(1, &message),
    };

    let Some(found) = extract_url_ranked(&text) else {
        return CommandOutput::failure(1, "no url found in log text");
    };

    if json {
        return match serde_json::to_string(&found) {
            Ok(body) => CommandOutput::ok(format!("{body}\n")),
            Err(err) => CommandOutput::failure(1, &format!("encode output: {err}")),
        };
    }
    CommandOutput::ok(format!("{}\n", found.value))
}
