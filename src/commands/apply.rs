//! Apply command implementation
//!
//! Applies each repository's patch queue, in order, on top of its pristine
//! working tree. Repositories already up to date are skipped; a dirty tree
//! or a conflicting patch fails that repository without stopping the rest.

use anyhow::Result;
use clap::Args;

use super::{finish, Context};

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {}

/// Execute the `apply` command.
pub fn execute(ctx: &Context, _args: ApplyArgs) -> Result<()> {
    let project = ctx.project()?;
    let report = project.apply_all();
    finish(ctx, "apply", &report)
}
