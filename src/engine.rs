//! # Per-Run Orchestration
//!
//! `Project` ties the lock file, patch store, and applied-state tracker
//! together and exposes the three run-level operations: sync, apply, and
//! capture. Each repository entry is an independent unit of work (its
//! working tree, patch namespace, and state record are disjoint from every
//! other entry's), so entries run in parallel with rayon. Within one
//! repository, steps stay strictly sequential because each step's
//! postcondition is the next step's precondition.
//!
//! A failing repository never aborts its siblings: every operation attempts
//! all entries and aggregates per-repository results into a `Report`. The
//! CLI turns a report with any failure into a non-zero exit status.

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::apply::{apply_repo, ApplyOutcome};
use crate::capture::{capture_repo, CaptureOutcome};
use crate::defaults::{LOCK_FILE_NAME, PATCHES_DIR, PATCHINFO_DIR};
use crate::error::{Error, Result};
use crate::lock::{LockFile, RepoEntry};
use crate::state::StateTracker;
use crate::store::PatchStore;
use crate::sync::sync_repo;

/// What one repository operation accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Working tree materialized pristine at the pinned revision.
    Synced,
    /// Queue already applied; no filesystem writes performed.
    UpToDate,
    /// Full queue applied in order.
    Applied { patches: usize },
    /// Empty queue; nothing to apply.
    NoPatches,
    /// Delta captured into a consolidated patch.
    Captured { patch: String },
    /// Working tree matches the pinned revision; nothing to capture.
    NoChanges,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Synced => write!(f, "synced to pinned revision"),
            Outcome::UpToDate => write!(f, "already up to date"),
            Outcome::Applied { patches } => write!(f, "applied {} patch(es)", patches),
            Outcome::NoPatches => write!(f, "no patches to apply"),
            Outcome::Captured { patch } => write!(f, "captured delta into {}", patch),
            Outcome::NoChanges => write!(f, "no changes to capture"),
        }
    }
}

impl From<ApplyOutcome> for Outcome {
    fn from(outcome: ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::UpToDate => Outcome::UpToDate,
            ApplyOutcome::Applied { patches } => Outcome::Applied { patches },
            ApplyOutcome::NoPatches => Outcome::NoPatches,
        }
    }
}

impl From<CaptureOutcome> for Outcome {
    fn from(outcome: CaptureOutcome) -> Self {
        match outcome {
            CaptureOutcome::Captured { patch, .. } => Outcome::Captured { patch },
            CaptureOutcome::NoChanges => Outcome::NoChanges,
        }
    }
}

/// Per-repository results of one run, sorted by key.
#[derive(Debug)]
pub struct Report {
    pub results: Vec<(String, Result<Outcome>)>,
}

impl Report {
    /// Number of repositories that failed.
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }

    /// True when every repository succeeded.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// A loaded patch system: lock configuration plus its on-disk companions.
#[derive(Debug)]
pub struct Project {
    pub lock: LockFile,
    pub checkout_root: PathBuf,
    store: PatchStore,
    tracker: StateTracker,
}

impl Project {
    /// Load the project rooted at `system_root` (the directory holding
    /// `deps.lock.json`, `patches/`, and `patchinfo/`).
    ///
    /// The checkout root defaults to the parent of the system root, so a
    /// `product/patch_system/` layout materializes trees under `product/`.
    pub fn load(system_root: &Path, checkout_root: Option<PathBuf>) -> Result<Self> {
        let system_root = if system_root.exists() {
            system_root.canonicalize()?
        } else {
            system_root.to_path_buf()
        };
        let lock = LockFile::from_file(&system_root.join(LOCK_FILE_NAME))?;
        let checkout_root = match checkout_root {
            Some(dir) => dir,
            None => system_root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| system_root.clone()),
        };

        Ok(Self {
            lock,
            checkout_root,
            store: PatchStore::new(system_root.join(PATCHES_DIR)),
            tracker: StateTracker::new(system_root.join(PATCHINFO_DIR)),
        })
    }

    /// Materialize every tracked repository at its pinned revision.
    ///
    /// Destructive: discards local modifications in every working tree.
    pub fn sync_all(&self) -> Report {
        self.run_all(|key, entry| {
            sync_repo(key, entry, &self.checkout_root, &self.tracker).map(|()| Outcome::Synced)
        })
    }

    /// Apply every repository's patch queue.
    pub fn apply_all(&self) -> Report {
        self.run_all(|key, entry| {
            apply_repo(key, entry, &self.checkout_root, &self.store, &self.tracker)
                .map(Outcome::from)
        })
    }

    /// Capture the working tree delta of every repository.
    pub fn capture_all(&self) -> Report {
        self.run_all(|key, entry| {
            capture_repo(key, entry, &self.checkout_root, &self.store, &self.tracker)
                .map(Outcome::from)
        })
    }

    /// Capture a single repository by key.
    pub fn capture_one(&self, key: &str) -> Report {
        let result = self.lock.get(key).and_then(|entry| {
            capture_repo(key, entry, &self.checkout_root, &self.store, &self.tracker)
                .map(Outcome::from)
        });
        Report {
            results: vec![(key.to_string(), result)],
        }
    }

    /// Run `op` for every lock entry in parallel and aggregate results.
    ///
    /// One entry failing is recorded in the report; siblings still run.
    fn run_all<F>(&self, op: F) -> Report
    where
        F: Fn(&str, &RepoEntry) -> Result<Outcome> + Sync,
    {
        let mut results: Vec<(String, Result<Outcome>)> = self
            .lock
            .repos
            .par_iter()
            .map(|(key, entry)| (key.clone(), op(key, entry)))
            .collect();
        results.sort_by(|a, b| a.0.cmp(&b.0));
        Report { results }
    }
}
