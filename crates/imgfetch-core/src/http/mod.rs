//! HTTP GET of a single image.
//!
//! Uses the curl crate (libcurl easy interface). The response head is checked
//! against the [`ContentPolicy`] when the first body bytes arrive; a rejected
//! response aborts the transfer so nothing more is read.

mod head;

pub use head::ResponseHead;

use std::cell::RefCell;
use std::str;
use std::time::Duration;

use crate::error::FetchError;
use crate::validate::{ContentPolicy, SkipReason};

/// Settings for [`CurlSource`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    /// Connect timeout, and the longest the transfer may stall.
    pub timeout: Duration,
    pub policy: ContentPolicy,
}

/// Result of a GET that reached a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// Head passed validation; full body in memory.
    Body { head: ResponseHead, bytes: Vec<u8> },
    /// Head failed validation; body was not kept.
    Skipped(SkipReason),
}

/// Something that can fetch a URL. [`CurlSource`] is the real one.
pub trait ImageSource {
    fn get(&self, url: &str) -> Result<Download, FetchError>;
}

/// Decision taken once the final response head is known.
enum Verdict {
    Accepted,
    Rejected(SkipReason),
    BadStatus(u32),
}

fn evaluate(head: &ResponseHead, policy: &ContentPolicy) -> Verdict {
    match head.status {
        Some(code) if !head.is_success() => Verdict::BadStatus(code),
        _ => match policy.check(head) {
            Ok(()) => Verdict::Accepted,
            Err(reason) => Verdict::Rejected(reason),
        },
    }
}

/// Blocking libcurl-backed source. One Easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlSource {
    settings: FetchSettings,
}

impl CurlSource {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

impl ImageSource for CurlSource {
    /// Performs the GET. Follows redirects; only the final response counts.
    /// Runs in the current thread.
    fn get(&self, url: &str) -> Result<Download, FetchError> {
        let policy = &self.settings.policy;
        let header_lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let mut verdict: Option<Verdict> = None;
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(30)?;
        easy.useragent(&self.settings.user_agent)?;
        easy.connect_timeout(self.settings.timeout)?;
        // Stall detection: under 1 byte/s for `timeout` aborts the transfer.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.settings.timeout)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    let mut lines = header_lines.borrow_mut();
                    if head::is_status_line(line) {
                        lines.clear();
                    }
                    lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                let decided = verdict.get_or_insert_with(|| {
                    evaluate(&head::parse_head(&header_lines.borrow()), policy)
                });
                match decided {
                    Verdict::Accepted => {
                        body.extend_from_slice(data);
                        Ok(data.len())
                    }
                    // Short write makes libcurl abort the transfer.
                    _ => Ok(0),
                }
            })?;
            transfer.perform()
        };

        let head = head::parse_head(&header_lines.into_inner());
        // A rejection aborts the transfer on purpose, so it wins over the curl error.
        let verdict = match (verdict, performed) {
            (Some(Verdict::Rejected(reason)), _) => Verdict::Rejected(reason),
            (Some(Verdict::BadStatus(status)), _) => Verdict::BadStatus(status),
            (_, Err(e)) => return Err(e.into()),
            (Some(Verdict::Accepted), Ok(())) => Verdict::Accepted,
            // Empty body: the write callback never ran.
            (None, Ok(())) => evaluate(&head, policy),
        };

        match verdict {
            Verdict::Accepted => Ok(Download::Body { head, bytes: body }),
            Verdict::Rejected(reason) => {
                tracing::debug!(url, %reason, "response rejected by policy");
                Ok(Download::Skipped(reason))
            }
            Verdict::BadStatus(status) => Err(FetchError::HttpStatus {
                status,
                url: url.to_string(),
            }),
        }
    }
}
