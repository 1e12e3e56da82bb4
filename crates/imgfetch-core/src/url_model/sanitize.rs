//! Filename sanitization.

/// Keeps alphanumerics (any script), space, `.` and `_`; drops every other
/// character, then trims trailing whitespace.
///
/// Path separators never survive, so the result is always a single path
/// component (or empty).
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_'))
        .collect();
    kept.trim_end().to_string()
}
