//! Sync command implementation
//!
//! Materializes every tracked repository pristine at its pinned revision.
//! This discards all local modifications in every tracked working tree, so
//! the command refuses to run without explicit confirmation (`--yes`) and
//! offers `--dry-run` to preview what would happen.

use anyhow::Result;
use clap::Args;

use patchlock::output::emoji;

use super::{finish, Context};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Confirm that local modifications in all tracked working trees may
    /// be discarded
    #[arg(short, long)]
    pub yes: bool,

    /// Show what would be synced without touching any working tree
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the `sync` command.
pub fn execute(ctx: &Context, args: SyncArgs) -> Result<()> {
    let project = ctx.project()?;

    if args.dry_run {
        if project.lock.repos.is_empty() {
            println!("No repositories in the lock file; nothing to sync.");
            return Ok(());
        }
        for (key, entry) in &project.lock.repos {
            println!(
                "{} {}: would sync {} @ {} into {}",
                emoji(&ctx.output, "🔍", "[DRY-RUN]"),
                key,
                entry.url,
                entry.rev,
                project.checkout_root.join(&entry.path).display()
            );
        }
        return Ok(());
    }

    if !args.yes {
        anyhow::bail!(
            "sync discards ALL local modifications (tracked changes and untracked \
             files) in every tracked working tree.\n\
             Re-run with --yes to confirm, or --dry-run to preview."
        );
    }

    println!(
        "{} Resetting {} repositories to their pinned revisions (local changes will be discarded)...",
        emoji(&ctx.output, "⚠️", "[WARN]"),
        project.lock.repos.len()
    );

    let report = project.sync_all();
    finish(ctx, "sync", &report)
}
