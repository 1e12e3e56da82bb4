//! CLI for the imgfetch image fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgfetch_core::config::{self, ImgFetchConfig};
use std::io;
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_fetch};

/// Top-level CLI. Without a subcommand, fetches images.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "Fetch images from URLs into a local folder, skipping duplicates", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Image URLs; each may hold several comma-separated URLs. Prompts on stdin when none are given.
    pub urls: Vec<String>,

    /// Save images (and the hash ledger) here instead of the configured directory.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute SHA-256 of a file and report whether the ledger already has it.
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Directory whose ledger is consulted.
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

fn with_override(cfg: ImgFetchConfig, output_dir: Option<&Path>) -> ImgFetchConfig {
    match output_dir {
        Some(dir) => cfg.with_output_dir(dir),
        None => cfg,
    }
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            Some(CliCommand::Checksum { path, output_dir }) => {
                let cfg = with_override(cfg, output_dir.as_deref());
                run_checksum(&cfg, &path, &mut io::stdout().lock())?;
            }
            None => {
                let cfg = with_override(cfg, cli.output_dir.as_deref());
                run_fetch(&cfg, &cli.urls, io::stdin().lock(), &mut io::stdout().lock())?;
            }
        }

        Ok(())
    }
}
