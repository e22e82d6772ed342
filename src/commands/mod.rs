//! # CLI Command Implementations
//!
//! One module per subcommand of the `patchlock` command-line tool. Each
//! module defines a clap `Args` struct and an `execute` function that calls
//! into the `patchlock` library.
//!
//! Commands share the `Context` (patch system root, checkout root override,
//! output configuration) and the report printer: every operation prints one
//! status line per repository and the process exits non-zero if any
//! repository failed, after all of them were attempted.

use std::path::PathBuf;

use anyhow::Result;

use patchlock::engine::{Project, Report};
use patchlock::output::{emoji, OutputConfig};

pub mod apply;
pub mod capture;
pub mod sync;

/// Global state shared by every subcommand.
pub struct Context {
    /// Patch system root (holds deps.lock.json, patches/, patchinfo/).
    pub dir: PathBuf,
    /// Optional override for where working trees live.
    pub checkout_root: Option<PathBuf>,
    /// Color/emoji preferences.
    pub output: OutputConfig,
}

impl Context {
    /// Load the project for this invocation.
    pub fn project(&self) -> Result<Project> {
        Ok(Project::load(&self.dir, self.checkout_root.clone())?)
    }
}

/// Print per-repository results and turn failures into a non-zero exit.
pub fn finish(ctx: &Context, operation: &str, report: &Report) -> Result<()> {
    for (key, result) in &report.results {
        match result {
            Ok(outcome) => {
                println!("{} {}: {}", emoji(&ctx.output, "✅", "[OK]"), key, outcome);
            }
            Err(error) => {
                eprintln!("{} {}: {}", emoji(&ctx.output, "❌", "[FAIL]"), key, error);
            }
        }
    }

    let failed = report.failed();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} repositories failed during {}",
            failed,
            report.results.len(),
            operation
        );
    }

    if report.results.is_empty() {
        println!("No repositories in the lock file; nothing to do.");
    }
    Ok(())
}
