//! Capture command implementation
//!
//! Collapses the current working tree delta of one repository (or all of
//! them) into a single consolidated patch that replaces the repository's
//! patch queue. Untracked, unstaged files are excluded; stage a new file
//! with `git add` inside the working tree to include it.

use anyhow::Result;
use clap::Args;

use super::{finish, Context};

/// Arguments for the capture command
#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Repository key to capture; captures every repository when omitted
    #[arg(value_name = "KEY")]
    pub key: Option<String>,
}

/// Execute the `capture` command.
pub fn execute(ctx: &Context, args: CaptureArgs) -> Result<()> {
    let project = ctx.project()?;
    let report = match &args.key {
        Some(key) => project.capture_one(key),
        None => project.capture_all(),
    };
    finish(ctx, "capture", &report)
}
