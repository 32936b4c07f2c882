//! triage-links: clickable source links for test-failure reports.
//!
//! Turns the raw pieces of a failure report (a script path, an error line, a
//! stack trace, free-form logs) into links a human can click: a `file://` URL
//! anchored at the failing line, the page URL the test was exercising, and a
//! viewer-local rewrite of a `file://` URL produced on another machine.
//!
//! Every link operation is a pure function that degrades to an empty string,
//! `None`, or its input unchanged instead of failing.

pub mod error;
pub mod file_url;
pub mod line_anchor;
pub mod log_url;
pub mod playwright;
pub mod remote_map;
pub mod report;
pub mod stack_trace;

pub use error::LinkError;
pub use file_url::{file_exists, normalize_path, to_file_url};
pub use line_anchor::{file_url_with_line, with_line};
pub use log_url::{extract_url, extract_url_ranked, ExtractedUrl};
pub use remote_map::{remap_to_local, PathMappingConfig};
pub use report::{FailureReport, FileReference, LinkedReport};

/// Crate identity label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "triage-links"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "triage-links");
    }

    #[test]
    fn link_pipelines_compose() {
        let url = with_line(&to_file_url("/srv/tests/demo.spec.js"), Some(14));
        assert_eq!(url, "file:///srv/tests/demo.spec.js#L14");

        let local = remap_to_local(&url, "/home/me/checkout");
        assert_eq!(local, "file:///home/me/checkout/demo.spec.js#L14");

        let page = extract_url("DEBUG: Navigating to https://demo.playwright.dev/todomvc");
        assert_eq!(page.as_deref(), Some("https://demo.playwright.dev/todomvc"));
    }
}
