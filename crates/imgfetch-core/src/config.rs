use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::FetchSettings;
use crate::validate::ContentPolicy;

/// Directory (relative to the working directory) images are saved into.
pub const DEFAULT_OUTPUT_DIR: &str = "Fetched_Images";
/// Ledger file name inside the output directory.
pub const DEFAULT_LEDGER_FILE: &str = "hashes.txt";
pub const DEFAULT_USER_AGENT: &str = "Ubuntu Image Fetcher 1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

fn default_allowed_content_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
    ]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_ledger_file() -> String {
    DEFAULT_LEDGER_FILE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

/// Global configuration loaded from `~/.config/imgfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgFetchConfig {
    /// Directory images and the ledger live in.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Ledger file name, relative to `output_dir`.
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,
    /// Value of the `User-Agent` request header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Connect timeout in seconds, and how long a transfer may stall before
    /// it is abandoned.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Largest `Content-Length` accepted, in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Substrings, one of which the `Content-Type` header must contain.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl Default for ImgFetchConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            ledger_file: default_ledger_file(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_content_types: default_allowed_content_types(),
        }
    }
}

impl ImgFetchConfig {
    /// Full path of the hash ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.output_dir.join(&self.ledger_file)
    }

    /// HTTP client settings derived from this config.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            policy: ContentPolicy {
                allowed_content_types: self.allowed_content_types.clone(),
                max_bytes: self.max_bytes,
            },
        }
    }

    /// Returns a copy with `output_dir` replaced (CLI `--output-dir`).
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.output_dir = dir.to_path_buf();
        self
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgFetchConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` but with an explicit config file location.
pub fn load_or_init_at(path: &Path) -> Result<ImgFetchConfig> {
    if !path.exists() {
        let default_cfg = ImgFetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ImgFetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
