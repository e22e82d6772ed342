//! # Applied-State Tracker
//!
//! Per-repository record of which patch queue content was last applied,
//! stored as `patchinfo/<key>.json`. The record is a memoization cache over
//! a pure function of (pinned revision, patch queue content): it is always
//! re-derivable, never authoritative, and safe to delete. Deleting it just
//! forces the full pristine check and re-apply on the next run.
//!
//! The tracker never inspects working-tree contents. It only compares the
//! queue hash recorded at the end of the last successful apply against the
//! hash of the current patch store contents.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{queue_hash, PatchFile};

/// Name and content hash of one patch as it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub name: String,
    pub hash: String,
}

/// The auto-generated applied-state record for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedState {
    /// Combined hash of the queue (order, names, content) that was applied.
    pub queue_hash: String,
    /// Per-patch hashes, kept for diagnostics when the queue drifts.
    pub patches: Vec<PatchRecord>,
    /// Unix timestamp of the successful apply.
    pub applied_at: u64,
}

impl AppliedState {
    /// Build a record describing `queue` as fully applied right now.
    pub fn from_queue(queue: &[PatchFile]) -> Self {
        Self {
            queue_hash: queue_hash(queue),
            patches: queue
                .iter()
                .map(|p| PatchRecord {
                    name: p.name.clone(),
                    hash: p.content_hash(),
                })
                .collect(),
            applied_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// What the recorded state says about the current patch queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    /// The working tree already reflects exactly this queue.
    UpToDate,
    /// No record: the tree should be pristine at the pinned revision.
    Unpatched,
    /// A record exists but does not match the current queue. Treated
    /// conservatively: the operator must re-sync before applying.
    Unknown,
}

/// On-disk tracker rooted at the `patchinfo/` directory.
#[derive(Debug, Clone)]
pub struct StateTracker {
    root: PathBuf,
}

impl StateTracker {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Load the record for `key`, if one exists.
    pub fn load(&self, key: &str) -> Result<Option<AppliedState>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let state = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    /// Classify the current queue against the recorded state.
    ///
    /// A corrupt record is `Unknown`, not `Unpatched`: something applied
    /// patches here before, so assuming a pristine tree would be wrong.
    pub fn status(&self, key: &str, current_queue_hash: &str) -> Result<PatchStatus> {
        match self.load(key) {
            Ok(None) => Ok(PatchStatus::Unpatched),
            Ok(Some(state)) if state.queue_hash == current_queue_hash => Ok(PatchStatus::UpToDate),
            Ok(Some(_)) => Ok(PatchStatus::Unknown),
            Err(Error::Json(e)) => {
                debug!("[{}] unreadable applied-state record: {}", key, e);
                Ok(PatchStatus::Unknown)
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the record for `key` after a successful apply.
    ///
    /// Written via a temp file and rename so a partially written record is
    /// never observed.
    pub fn record(&self, key: &str, state: &AppliedState) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.record_path(key);
        let tmp = self.root.join(format!(".{}.json.tmp", key));
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Remove the record for `key`; the tree is considered pristine again.
    pub fn clear(&self, key: &str) -> Result<()> {
        let path = self.record_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
