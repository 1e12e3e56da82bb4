//! URL modeling and filename derivation.
//!
//! Splits the user's URL list and derives safe local filenames from URL paths.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Filename used when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "downloaded_image.jpg";

/// Derives the filename an image from `url` is saved under.
///
/// Takes the last path segment of `url` and sanitizes it. Falls back to
/// [`DEFAULT_FILENAME`] when the result is empty or is `.`/`..`.
///
/// # Examples
///
/// - `derive_filename("https://example.com/photos/cat.jpg")` → `"cat.jpg"`
/// - `derive_filename("https://example.com/")` → `"downloaded_image.jpg"`
pub fn derive_filename(url: &str) -> String {
    let sanitized = filename_from_url_path(url)
        .map(|segment| sanitize_filename(&segment))
        .unwrap_or_default();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Splits comma-separated user input into URLs.
///
/// Entries are trimmed; empty and whitespace-only entries are dropped.
pub fn split_url_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
