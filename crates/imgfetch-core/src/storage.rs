//! Disk I/O for saved images.
//!
//! Images are written to a temp file inside the output directory and renamed
//! over the final name, so a failed write never leaves a truncated image.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Ensure the output directory exists; create it (and parents) if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        let meta = fs::metadata(dir).with_context(|| format!("stat {}", dir.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("{} exists and is not a directory", dir.display());
        }
        return Ok(());
    }
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "created output directory");
    Ok(())
}

/// Output directory that images are saved into.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path `filename` would be saved at.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Write `bytes` to `<dir>/<filename>`, replacing any existing file.
    /// Returns the final path.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let target = self.path_for(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}
