//! Path normalization and `file://` URL assembly.
//!
//! Paths from failure reports arrive in whatever shape the reporting machine
//! used: relative to the test runner's working directory, Windows drive paths
//! with backslashes, or POSIX absolute paths. They all come out as one
//! absolute, forward-slash path and from there as a percent-encoded `file://`
//! URL that never contains a backslash.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

/// Bytes left readable in an encoded path. Separators and drive colons stay
/// as-is; everything else outside the unreserved set is `%XX` encoded.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Resolve `raw_path` to an absolute, forward-slash path.
///
/// Relative paths are joined onto the current working directory. Drive-letter
/// paths (`C:\tests\a.js`, `c:/tests`) count as absolute on every platform,
/// so a report produced on Windows normalizes the same way everywhere.
/// `.` segments, repeated separators and `..` are folded lexically; `..`
/// never climbs above the root.
pub fn normalize_path(raw_path: &str) -> String {
    if raw_path.is_empty() {
        return String::new();
    }

    let slashed = raw_path.replace('\\', "/");
    let absolute = if is_rooted(&slashed) {
        slashed
    } else {
        match std::env::current_dir() {
            Ok(cwd) => {
                let base = cwd.to_string_lossy().replace('\\', "/");
                format!("{}/{}", base.trim_end_matches('/'), slashed)
            }
            Err(err) => {
                debug!(path = %raw_path, error = %err, "current dir unavailable; keeping relative path");
                slashed
            }
        }
    };

    fold_segments(&absolute)
}

/// Convert a file-system path into a clickable `file://` URL.
///
/// Empty input yields an empty string. POSIX paths come out as
/// `file:///srv/a.js` (the path supplies the third slash); drive paths as
/// `file:///C:/a.js`.
pub fn to_file_url(raw_path: &str) -> String {
    if raw_path.is_empty() {
        return String::new();
    }
    let normalized = normalize_path(raw_path);
    assemble_file_url(&encode_path(&normalized))
}

/// Advisory check that `path` names an existing regular file.
///
/// Any I/O failure (missing file, permissions, malformed path) is reported as
/// `false`.
pub fn file_exists(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(err) => {
            debug!(path = %path, error = %err, "file existence check failed");
            false
        }
    }
}

pub(crate) fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ENCODE_SET).to_string()
}

pub(crate) fn assemble_file_url(encoded_path: &str) -> String {
    if encoded_path.starts_with('/') {
        format!("file://{encoded_path}")
    } else {
        format!("file:///{encoded_path}")
    }
}

/// `C:`, `C:/...` or `/...`.
pub(crate) fn is_rooted(path: &str) -> bool {
    path.starts_with('/') || drive_prefix(path).is_some()
}

fn drive_prefix(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    if bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
    {
        return Some(&path[..2]);
    }
    None
}

fn fold_segments(path: &str) -> String {
    let (prefix, rest) = match drive_prefix(path) {
        Some(drive) => (drive, &path[drive.len()..]),
        None => ("", path),
    };
    let rooted = !prefix.is_empty() || rest.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("{prefix}/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
