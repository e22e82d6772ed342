//! # Patch Applier
//!
//! Brings a materialized working tree to reflect the full, in-order
//! application of the repository's patch queue, and records success in the
//! applied-state tracker.
//!
//! The applier is strict about its precondition: the tree must be either
//! already up to date with the current queue (no-op) or pristine at the
//! pinned revision. Anything else fails with `DirtyWorkingTree`: silently
//! mutating an already-patched or hand-edited tree risks double-application
//! or silent divergence, and only a re-sync restores a known-good state.
//!
//! Queue order encodes a dependency chain: later patches may assume earlier
//! ones. The first patch that fails to apply stops the run with
//! `PatchConflict` naming it; later patches are not attempted and no state
//! is recorded.

use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::git;
use crate::lock::RepoEntry;
use crate::state::{AppliedState, PatchStatus, StateTracker};
use crate::store::{queue_hash, PatchStore};

/// Result of a successful apply run for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The tracker matched the current queue; nothing was touched.
    UpToDate,
    /// The full queue was applied to a pristine tree.
    Applied { patches: usize },
    /// The queue is empty; there is nothing to apply.
    NoPatches,
}

/// Apply the patch queue for one repository.
pub fn apply_repo(
    key: &str,
    entry: &RepoEntry,
    checkout_root: &Path,
    store: &PatchStore,
    tracker: &StateTracker,
) -> Result<ApplyOutcome> {
    let target = checkout_root.join(&entry.path);
    if !git::is_work_tree(&target) {
        return Err(Error::MissingWorkingTree {
            key: key.to_string(),
            path: target,
        });
    }

    let queue = store.queue(key)?;
    if queue.is_empty() {
        debug!("[{}] no patches in queue", key);
        return Ok(ApplyOutcome::NoPatches);
    }

    let current_hash = queue_hash(&queue);
    match tracker.status(key, &current_hash)? {
        PatchStatus::UpToDate => {
            debug!("[{}] queue already applied, skipping", key);
            return Ok(ApplyOutcome::UpToDate);
        }
        PatchStatus::Unknown => {
            return Err(Error::DirtyWorkingTree {
                key: key.to_string(),
                message: "applied-state record does not match the current patch queue; \
                          re-sync before applying"
                    .to_string(),
            });
        }
        PatchStatus::Unpatched => {}
    }

    // Unpatched per the tracker: the tree must actually be pristine at the
    // pinned revision before any patch touches it.
    let pinned =
        git::resolve_commit(&target, &entry.rev).map_err(|e| Error::UnresolvableRevision {
            key: key.to_string(),
            revision: entry.rev.clone(),
            message: e.to_string(),
        })?;
    let head = git::head_commit(&target)?;
    if head != pinned {
        return Err(Error::DirtyWorkingTree {
            key: key.to_string(),
            message: format!(
                "HEAD is at {} instead of pinned revision {}; re-sync before applying",
                head, pinned
            ),
        });
    }
    let status = git::status_porcelain(&target)?;
    if !status.is_empty() {
        return Err(Error::DirtyWorkingTree {
            key: key.to_string(),
            message: "working tree has local modifications; re-sync before applying".to_string(),
        });
    }

    for patch in &queue {
        info!("[{}] applying {}", key, patch.name);
        git::apply_patch(&target, &store.patch_path(key, &patch.name)).map_err(|e| {
            // Stop at the first conflict; the tree is left as-is for
            // inspection and a re-sync recovers.
            Error::PatchConflict {
                key: key.to_string(),
                patch: patch.name.clone(),
                message: e.to_string(),
            }
        })?;
    }

    // Keep the index clean: patches modify the working tree only.
    git::reset_index(&target)?;
    tracker.record(key, &AppliedState::from_queue(&queue))?;

    Ok(ApplyOutcome::Applied {
        patches: queue.len(),
    })
}
