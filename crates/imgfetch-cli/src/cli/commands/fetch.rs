//! `imgfetch [URLS]...` – fetch images, prompting for URLs when none are given.

use anyhow::{Context, Result};
use imgfetch_core::batch::{run_batch, BatchSummary};
use imgfetch_core::config::ImgFetchConfig;
use imgfetch_core::fetcher::Fetcher;
use imgfetch_core::report;
use imgfetch_core::url_model::split_url_list;
use std::io::{BufRead, Write};

/// Ask for a comma-separated URL list on `input`. EOF counts as an empty answer.
fn prompt_urls(input: &mut impl BufRead, out: &mut impl Write) -> Result<Vec<String>> {
    write!(out, "{}", report::PROMPT)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("read URLs from stdin")?;
    Ok(split_url_list(&line))
}

/// Runs one fetch session: banner, URL list (arguments or prompt), one status
/// block per URL, closing line. Per-URL failures are printed, never returned.
pub fn run_fetch(
    cfg: &ImgFetchConfig,
    args: &[String],
    mut input: impl BufRead,
    out: &mut impl Write,
) -> Result<BatchSummary> {
    writeln!(out, "{}", report::WELCOME)?;
    writeln!(out, "{}", report::TAGLINE)?;
    writeln!(out)?;

    let urls: Vec<String> = if args.is_empty() {
        prompt_urls(&mut input, out)?
    } else {
        args.iter().flat_map(|a| split_url_list(a)).collect()
    };
    let mut fetcher = Fetcher::from_config(cfg)?;
    tracing::info!(count = urls.len(), dir = %fetcher.images().dir().display(), "starting batch");
    let mut write_err = None;
    let summary = run_batch(&mut fetcher, &urls, |url, result| {
        for line in report::status_lines(url, result) {
            if let Err(e) = writeln!(out, "{}", line) {
                write_err.get_or_insert(e);
            }
        }
    });
    if let Some(e) = write_err {
        return Err(e).context("write to stdout");
    }

    writeln!(out)?;
    writeln!(out, "{}", report::CLOSING)?;
    Ok(summary)
}
