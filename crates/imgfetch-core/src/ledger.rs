//! Deduplication ledger: the set of content digests already saved.
//!
//! The on-disk form is an append-only text file with one lowercase hex digest
//! per line. Entries are never removed and their order carries no meaning.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::checksum::is_digest;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("read ledger {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("append to ledger {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Set of previously recorded digests. Implementations decide where it lives.
pub trait HashStore {
    /// True if `digest` was recorded before.
    fn contains(&self, digest: &str) -> Result<bool, LedgerError>;

    /// Record `digest`. Recording an already present digest is allowed.
    fn insert(&mut self, digest: &str) -> Result<(), LedgerError>;
}

/// Ledger backed by a flat file. Every lookup rereads the file so that edits
/// made between URLs (or by a previous run) are seen.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded digests, in insertion order. Missing file → empty.
    ///
    /// Hex is compared case-insensitively. Lines that are not a digest
    /// (hand edits, a clobbered file) are ignored with a warning.
    pub fn entries(&self) -> Result<Vec<String>, LedgerError> {
        let data = match fs::read(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LedgerError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let mut ignored = 0usize;
        let entries: Vec<String> = String::from_utf8_lossy(&data)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_ascii_lowercase)
            .filter(|l| {
                let ok = is_digest(l);
                ignored += usize::from(!ok);
                ok
            })
            .collect();
        if ignored > 0 {
            tracing::warn!(path = %self.path.display(), ignored, "ledger has lines that are not digests");
        }
        Ok(entries)
    }
}

impl HashStore for FileLedger {
    fn contains(&self, digest: &str) -> Result<bool, LedgerError> {
        Ok(self.entries()?.iter().any(|d| d == digest))
    }

    fn insert(&mut self, digest: &str) -> Result<(), LedgerError> {
        let append_err = |source| LedgerError::Append {
            path: self.path.clone(),
            source,
        };
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(append_err)?;
        writeln!(f, "{}", digest).map_err(append_err)?;
        tracing::debug!(digest, path = %self.path.display(), "recorded digest");
        Ok(())
    }
}

/// In-memory ledger for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    digests: HashSet<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl HashStore for MemoryLedger {
    fn contains(&self, digest: &str) -> Result<bool, LedgerError> {
        Ok(self.digests.contains(digest))
    }

    fn insert(&mut self, digest: &str) -> Result<(), LedgerError> {
        self.digests.insert(digest.to_string());
        Ok(())
    }
}
