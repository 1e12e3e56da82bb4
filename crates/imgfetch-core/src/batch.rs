//! Runs a list of URLs through a [`Fetcher`], strictly in order.

use crate::error::FetchError;
use crate::fetcher::{Fetcher, Outcome};
use crate::http::ImageSource;
use crate::ledger::HashStore;

/// Counts of how each URL in a batch ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.duplicates + self.failed
    }

    fn record(&mut self, result: &Result<Outcome, FetchError>) {
        match result {
            Ok(Outcome::Saved(_)) => self.saved += 1,
            Ok(Outcome::Skipped(_)) => self.skipped += 1,
            Ok(Outcome::Duplicate { .. }) => self.duplicates += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Processes every URL and hands each result to `on_result`. A failing URL
/// never stops the batch. Blank entries are ignored without a callback.
pub fn run_batch<S, L, F>(fetcher: &mut Fetcher<S, L>, urls: &[String], mut on_result: F) -> BatchSummary
where
    S: ImageSource,
    L: HashStore,
    F: FnMut(&str, &Result<Outcome, FetchError>),
{
    let mut summary = BatchSummary::default();
    for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        let result = fetcher.process(url);
        if let Err(e) = &result {
            tracing::warn!(url, error = %e, network = e.is_network(), timeout = e.is_timeout(), "fetch failed");
        }
        summary.record(&result);
        on_result(url, &result);
    }
    tracing::info!(
        saved = summary.saved,
        skipped = summary.skipped,
        duplicates = summary.duplicates,
        failed = summary.failed,
        "batch finished"
    );
    summary
}
