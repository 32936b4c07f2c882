//! Recover the page-under-test URL from free-form test logs.
//!
//! Test logs interleave navigation, assertion, and framework noise, so the
//! first URL in a log is often an API endpoint rather than the page the test
//! drove. Navigation cue words pick the right one; a bare URL is only used
//! when no cue matches at all.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Cue phrases in priority order. The first cue with any match in the text
/// wins, regardless of where a lower-priority cue appears.
pub const NAVIGATION_CUES: [&str; 6] = [
    "Navigating to",
    "Opening",
    "URL:",
    "Visiting",
    "Loading",
    "Navigate to",
];

/// Rank reported for a URL found without any cue.
pub const BARE_URL_RANK: usize = NAVIGATION_CUES.len();

const URL_TOKEN: &str = r"https?://[^\s\]]+";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedUrl {
    pub value: String,
    /// Index into [`NAVIGATION_CUES`], or [`BARE_URL_RANK`].
    pub matched_pattern_rank: usize,
}

/// The most likely navigation URL in `text`, if any.
pub fn extract_url(text: &str) -> Option<String> {
    extract_url_ranked(text).map(|found| found.value)
}

/// Like [`extract_url`], also reporting which pattern produced the match.
pub fn extract_url_ranked(text: &str) -> Option<ExtractedUrl> {
    if text.is_empty() {
        return None;
    }

    for (rank, re) in cue_patterns() {
        if let Some(found) = re.captures(text).and_then(|caps| caps.get(1)) {
            debug!(cue = NAVIGATION_CUES[*rank], rank, "log url matched navigation cue");
            return Some(ExtractedUrl {
                value: trim_trailing_punctuation(found.as_str()),
                matched_pattern_rank: *rank,
            });
        }
    }

    let found = bare_pattern()?.find(text)?;
    debug!("log url fell back to first bare url");
    Some(ExtractedUrl {
        value: trim_trailing_punctuation(found.as_str()),
        matched_pattern_rank: BARE_URL_RANK,
    })
}

fn trim_trailing_punctuation(value: &str) -> String {
    value
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';'))
        .to_string()
}

fn cue_patterns() -> &'static [(usize, Regex)] {
    static PATTERNS: OnceLock<Vec<(usize, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        NAVIGATION_CUES
            .iter()
            .enumerate()
            .filter_map(|(rank, cue)| {
                let pattern = format!(r"(?i){}\s+({URL_TOKEN})", regex::escape(cue));
                match Regex::new(&pattern) {
                    Ok(re) => Some((rank, re)),
                    Err(err) => {
                        debug!(cue, error = %err, "skipping navigation cue pattern");
                        None
                    }
                }
            })
            .collect()
    })
}

fn bare_pattern() -> Option<&'static Regex> {
    static BARE: OnceLock<Option<Regex>> = OnceLock::new();
    BARE.get_or_init(|| Regex::new(URL_TOKEN).ok()).as_ref()
}
