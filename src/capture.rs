//! # Patch Capturer
//!
//! Computes the full difference between the current working tree and the
//! pinned revision, and replaces the repository's patch queue with one
//! consolidated patch representing that entire delta.
//!
//! The capture covers modifications to tracked paths and any new paths the
//! developer explicitly staged (`git add`). Untracked, unstaged files are
//! excluded, so local scratch files never pollute the patch.
//!
//! Replacing the whole queue with a single artifact trades per-patch
//! provenance for a hard guarantee: re-running sync followed by apply
//! reproduces exactly the captured tree. Because the working tree already
//! reflects the new patch, the applied-state record is updated to mark the
//! fresh single-patch queue as applied.

use std::path::Path;

use log::info;

use crate::defaults::CAPTURE_PATCH_NAME;
use crate::error::{Error, Result};
use crate::git;
use crate::lock::RepoEntry;
use crate::state::{AppliedState, StateTracker};
use crate::store::PatchStore;

/// Result of a capture run for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The delta was captured and the queue replaced.
    Captured { patch: String, bytes: usize },
    /// The working tree matches the pinned revision; reported no-op.
    NoChanges,
}

/// Capture the working tree delta for one repository.
pub fn capture_repo(
    key: &str,
    entry: &RepoEntry,
    checkout_root: &Path,
    store: &PatchStore,
    tracker: &StateTracker,
) -> Result<CaptureOutcome> {
    let target = checkout_root.join(&entry.path);
    if !git::is_work_tree(&target) {
        return Err(Error::MissingWorkingTree {
            key: key.to_string(),
            path: target,
        });
    }

    let diff = git::diff_head(&target)?;
    if diff.is_empty() {
        return Ok(CaptureOutcome::NoChanges);
    }

    info!(
        "[{}] capturing {} bytes of delta into {}",
        key,
        diff.len(),
        CAPTURE_PATCH_NAME
    );
    store.replace(key, CAPTURE_PATCH_NAME, &diff)?;

    // The tree already reflects the new single-patch queue.
    let queue = store.queue(key)?;
    tracker.record(key, &AppliedState::from_queue(&queue))?;

    Ok(CaptureOutcome::Captured {
        patch: CAPTURE_PATCH_NAME.to_string(),
        bytes: diff.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PatchStatus;
    use crate::store::queue_hash;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git_in(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Product layout with one committed working tree under src/dep.
    fn setup(temp: &TempDir) -> (RepoEntry, PatchStore, StateTracker) {
        let tree = temp.path().join("src/dep");
        fs::create_dir_all(&tree).unwrap();
        git_in(&tree, &["init", "--quiet"]);
        git_in(&tree, &["config", "user.email", "test@example.com"]);
        git_in(&tree, &["config", "user.name", "Tester"]);
        fs::write(tree.join("code.txt"), "line1\nline2\n").unwrap();
        git_in(&tree, &["add", "-A"]);
        git_in(&tree, &["commit", "--quiet", "-m", "initial"]);

        let entry = RepoEntry {
            url: "unused".to_string(),
            rev: "HEAD".to_string(),
            path: "src/dep".to_string(),
        };
        let store = PatchStore::new(temp.path().join("patches"));
        let tracker = StateTracker::new(temp.path().join("patchinfo"));
        (entry, store, tracker)
    }

    #[test]
    fn test_capture_missing_working_tree() {
        let temp = TempDir::new().unwrap();
        let store = PatchStore::new(temp.path().join("patches"));
        let tracker = StateTracker::new(temp.path().join("patchinfo"));
        let entry = RepoEntry {
            url: "unused".to_string(),
            rev: "HEAD".to_string(),
            path: "src/missing".to_string(),
        };

        let err = capture_repo("dep", &entry, temp.path(), &store, &tracker).unwrap_err();
        assert!(matches!(err, Error::MissingWorkingTree { .. }));
        // Nothing was written.
        assert!(!temp.path().join("patches/dep").exists());
        assert!(!temp.path().join("patchinfo").exists());
    }

    #[test]
    fn test_capture_pristine_tree_is_noop() {
        let temp = TempDir::new().unwrap();
        let (entry, store, tracker) = setup(&temp);

        let outcome = capture_repo("dep", &entry, temp.path(), &store, &tracker).unwrap();
        assert_eq!(outcome, CaptureOutcome::NoChanges);
        assert!(store.queue("dep").unwrap().is_empty());
    }

    #[test]
    fn test_capture_replaces_queue_and_records_state() {
        let temp = TempDir::new().unwrap();
        let (entry, store, tracker) = setup(&temp);

        // A pre-existing queue collapses into the consolidated patch.
        let ns = temp.path().join("patches/dep");
        fs::create_dir_all(&ns).unwrap();
        fs::write(ns.join("001-old.patch"), "stale").unwrap();
        fs::write(ns.join("002-old.patch"), "stale too").unwrap();

        let tree = temp.path().join("src/dep");
        fs::write(tree.join("code.txt"), "line1\nline2\nline3\n").unwrap();

        let outcome = capture_repo("dep", &entry, temp.path(), &store, &tracker).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Captured { .. }));

        let queue = store.queue("dep").unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].name, CAPTURE_PATCH_NAME);
        let patch_text = String::from_utf8_lossy(&queue[0].content).into_owned();
        assert!(patch_text.contains("+line3"));

        // The new queue is already marked applied.
        assert_eq!(
            tracker.status("dep", &queue_hash(&queue)).unwrap(),
            PatchStatus::UpToDate
        );
    }

    #[test]
    fn test_capture_excludes_untracked_includes_staged() {
        let temp = TempDir::new().unwrap();
        let (entry, store, tracker) = setup(&temp);
        let tree = temp.path().join("src/dep");

        fs::write(tree.join("scratch.txt"), "local notes\n").unwrap();
        fs::write(tree.join("new_module.txt"), "staged content\n").unwrap();
        git_in(&tree, &["add", "new_module.txt"]);

        let outcome = capture_repo("dep", &entry, temp.path(), &store, &tracker).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Captured { .. }));

        let queue = store.queue("dep").unwrap();
        let patch_text = String::from_utf8_lossy(&queue[0].content).into_owned();
        assert!(patch_text.contains("new_module.txt"));
        assert!(!patch_text.contains("scratch.txt"));
    }
}
