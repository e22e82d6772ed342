//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use patchlock::output::OutputConfig;

use crate::commands;

/// Patchlock - Maintain a patch queue on top of pinned upstream repositories
#[derive(Parser, Debug)]
#[command(name = "patchlock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Patch system root: the directory holding deps.lock.json, patches/
    /// and patchinfo/
    #[arg(long, global = true, value_name = "DIR", env = "PATCHLOCK_DIR", default_value = ".")]
    dir: PathBuf,

    /// Where working trees are materialized (defaults to the parent of the
    /// patch system root)
    #[arg(long, global = true, value_name = "DIR")]
    checkout_root: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reset every tracked working tree to its pinned revision (destructive)
    Sync(commands::sync::SyncArgs),

    /// Apply each repository's patch queue to its pristine working tree
    Apply(commands::apply::ApplyArgs),

    /// Capture working tree changes into a consolidated patch
    Capture(commands::capture::CaptureArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG wins over the flag when set.
        env_logger::Builder::from_env(Env::default().default_filter_or(&self.log_level))
            .format_timestamp(None)
            .try_init()
            .ok();

        let ctx = commands::Context {
            dir: self.dir,
            checkout_root: self.checkout_root,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Sync(args) => commands::sync::execute(&ctx, args),
            Commands::Apply(args) => commands::apply::execute(&ctx, args),
            Commands::Capture(args) => commands::capture::execute(&ctx, args),
        }
    }
}
