//! Console wording for per-URL results and the batch.

use crate::error::FetchError;
use crate::fetcher::Outcome;

pub const WELCOME: &str = "Welcome to the Ubuntu Image Fetcher";
pub const TAGLINE: &str = "A tool for mindfully collecting images from the web";
pub const PROMPT: &str = "Enter image URLs (comma-separated): ";
pub const CLOSING: &str = "Connection strengthened. Community enriched.";

/// Lines printed for one URL's result.
pub fn status_lines(url: &str, result: &Result<Outcome, FetchError>) -> Vec<String> {
    match result {
        Ok(Outcome::Saved(saved)) => vec![
            format!("✓ Successfully fetched: {}", saved.filename),
            format!("✓ Image saved to {}", saved.path.display()),
        ],
        Ok(Outcome::Skipped(reason)) => vec![format!("✗ Skipping {} ({})", url, reason)],
        Ok(Outcome::Duplicate { .. }) => {
            vec![format!("⚠ Duplicate detected for {}, skipping.", url)]
        }
        Err(e) if e.is_network() => vec![format!("✗ Request error: {}", e)],
        Err(e) => vec![format!("✗ General error: {}", e)],
    }
}
