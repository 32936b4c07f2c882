//! `#L<n>` line anchors on clickable URLs.

use crate::file_url::to_file_url;

/// Anchor `base_url` at `line`.
///
/// A positive line appends `#L<line>`, replacing any fragment the URL already
/// carries so re-anchoring never stacks `#L3#L9`. A missing or non-positive
/// line means "no specific line" and returns `base_url` untouched.
pub fn with_line(base_url: &str, line: Option<i64>) -> String {
    match line {
        Some(n) if n > 0 => {
            let without_fragment = match base_url.split_once('#') {
                Some((head, _)) => head,
                None => base_url,
            };
            format!("{without_fragment}#L{n}")
        }
        _ => base_url.to_string(),
    }
}

/// `with_line(to_file_url(path), line)`; an empty path stays empty.
pub fn file_url_with_line(file_path: &str, line: Option<i64>) -> String {
    if file_path.is_empty() {
        return String::new();
    }
    with_line(&to_file_url(file_path), line)
}

#[cfg(test)]
mod tests {
    use super::{file_url_with_line, with_line};

    const BASE: &str = "file:///C:/bug-triage-engine/demo.spec.js";

    #[test]
    fn positive_line_appends_anchor() {
        assert_eq!(with_line(BASE, Some(42)), format!("{BASE}#L42"));
    }

    #[test]
    fn absent_or_non_positive_line_is_no_anchor() {
        assert_eq!(with_line(BASE, None), BASE);
        assert_eq!(with_line(BASE, Some(0)), BASE);
        assert_eq!(with_line(BASE, Some(-5)), BASE);
    }

    #[test]
    fn reanchoring_replaces_existing_fragment() {
        let once = with_line(BASE, Some(7));
        assert_eq!(with_line(&once, Some(7)), once);
        assert_eq!(with_line(&once, Some(9)), format!("{BASE}#L9"));
        assert_eq!(with_line(&once, None), once);
    }

    #[test]
    fn file_url_with_line_composes() {
        assert_eq!(
            file_url_with_line("c:\\bug-triage-engine\\demo.spec.js", Some(123)),
            "file:///c:/bug-triage-engine/demo.spec.js#L123"
        );
        assert_eq!(file_url_with_line("", Some(3)), "");
        assert_eq!(
            file_url_with_line("/srv/test.py", None),
            "file:///srv/test.py"
        );
    }
}
