//! `imgfetch checksum <path>` – digest of a local file and its ledger status.

use anyhow::Result;
use imgfetch_core::checksum;
use imgfetch_core::config::ImgFetchConfig;
use imgfetch_core::ledger::{FileLedger, HashStore};
use std::io::Write;
use std::path::Path;

/// Print the SHA-256 of `path` and whether the configured ledger records it.
pub fn run_checksum(cfg: &ImgFetchConfig, path: &Path, out: &mut impl Write) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    let ledger = FileLedger::new(cfg.ledger_path());
    let status = if ledger.contains(&digest)? {
        "in ledger"
    } else {
        "not in ledger"
    };
    writeln!(out, "{}  {}  ({})", digest, path.display(), status)?;
    Ok(())
}
