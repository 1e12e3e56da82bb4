//! Per-URL failure taxonomy.
//!
//! Validation rejections and duplicates are not errors; they are reported as
//! [`crate::fetcher::Outcome`] variants. Everything here is a real failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Debug, Error)]
pub enum FetchError {
    /// libcurl failed: bad URL, DNS, connect, TLS, timeout, truncated body.
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// Final response had a non-2xx status.
    #[error("HTTP {status} for url: {url}")]
    HttpStatus { status: u32, url: String },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("could not save {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Network-class failures (connection, timeout, HTTP status) as opposed to
    /// local ones (ledger, disk).
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::HttpStatus { .. })
    }

    /// True if the transport gave up because of the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_operation_timedout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_network() {
        let e = FetchError::HttpStatus {
            status: 404,
            url: "https://example.com/x.jpg".into(),
        };
        assert!(e.is_network());
        assert!(!e.is_timeout());
        assert_eq!(e.to_string(), "HTTP 404 for url: https://example.com/x.jpg");
    }

    #[test]
    fn write_is_not_network() {
        let e = FetchError::Write {
            path: PathBuf::from("Fetched_Images/x.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!e.is_network());
        assert!(e.to_string().starts_with("could not save Fetched_Images/x.jpg"));
    }

    #[test]
    fn ledger_is_not_network() {
        let e: FetchError = LedgerError::Read {
            path: PathBuf::from("hashes.txt"),
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        }
        .into();
        assert!(!e.is_network());
    }
}
