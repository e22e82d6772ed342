//! # Repository Materializer
//!
//! Ensures the working tree for a tracked repository exists and is reset
//! exactly to its pinned revision: clone on first run, fetch afterwards,
//! then a detached checkout followed by a hard reset and an untracked-file
//! clean.
//!
//! This operation is destructive: any uncommitted work in the
//! working tree is discarded. The engine performs it unconditionally; the
//! CLI owns the loud warning and confirmation in front of it.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::git;
use crate::lock::RepoEntry;
use crate::state::StateTracker;

/// Materialize one repository at its pinned revision.
///
/// Postcondition on success: the tree at `entry.path` (under
/// `checkout_root`) is checked out detached at the pinned revision with no
/// tracked modifications and no untracked files, and the applied-state
/// record for `key` is cleared. The tree is pristine.
pub fn sync_repo(
    key: &str,
    entry: &RepoEntry,
    checkout_root: &Path,
    tracker: &StateTracker,
) -> Result<()> {
    let target = checkout_root.join(&entry.path);

    if !git::is_work_tree(&target) {
        if target.exists() {
            // A directory without repository metadata cannot be fetched
            // into; start over from a fresh clone.
            warn!(
                "[{}] {} exists but is not a git repository, re-cloning",
                key,
                target.display()
            );
            fs::remove_dir_all(&target)?;
        }
        info!("[{}] cloning {}", key, entry.url);
        git::clone(&entry.url, &target).map_err(|e| Error::UnreachableSource {
            key: key.to_string(),
            url: entry.url.clone(),
            message: e.to_string(),
        })?;
    } else {
        info!("[{}] fetching {}", key, entry.url);
        git::fetch(&target).map_err(|e| Error::UnreachableSource {
            key: key.to_string(),
            url: entry.url.clone(),
            message: e.to_string(),
        })?;
    }

    let commit =
        git::resolve_commit(&target, &entry.rev).map_err(|e| Error::UnresolvableRevision {
            key: key.to_string(),
            revision: entry.rev.clone(),
            message: e.to_string(),
        })?;

    info!("[{}] checking out {} (detached)", key, commit);
    git::checkout_detached(&target, &commit)?;
    git::reset_hard(&target)?;
    git::clean_untracked(&target)?;

    // The tree is pristine now; any recorded applied state is stale.
    tracker.clear(key)?;
    Ok(())
}
