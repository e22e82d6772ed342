//! # Error Handling
//!
//! Centralized error type for the patch-queue engine, built on `thiserror`.
//!
//! Every failure is scoped to the repository it occurred in: variants carry
//! the repository `key` (and, where it matters, the exact patch name or git
//! stderr) so that the per-repository report in the CLI can name precisely
//! what went wrong. The engine never aborts sibling repositories because one
//! of them failed; errors are aggregated, not propagated across entries.
//!
//! The taxonomy follows the operational model:
//!
//! - `UnreachableSource` / `UnresolvableRevision`: sync-time environment or
//!   configuration problems (remote down, bad pin).
//! - `DirtyWorkingTree`: apply-time precondition violation; the operator
//!   must re-sync before applying.
//! - `PatchConflict`: the expected, recoverable apply failure, naming the
//!   exact patch in the queue that refused to apply.
//! - `AmbiguousPatchOrder`: two patch names that compare equal under the
//!   numeric-aware ordering; a configuration error in the patch store.
//!
//! "Nothing to capture" is deliberately *not* an error; the capturer reports
//! it as a successful no-op outcome instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for patchlock operations
#[derive(Error, Debug)]
pub enum Error {
    /// The lock file is missing, malformed, or semantically invalid.
    ///
    /// Includes the specific parsing or validation issue and optionally a
    /// hint about how to fix it.
    #[error("Lock file error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    LockParse {
        message: String,
        /// Optional hint for how to fix the lock file
        hint: Option<String>,
    },

    /// The remote for a repository could not be cloned or fetched.
    #[error("[{key}] unreachable source {url}: {message}")]
    UnreachableSource {
        key: String,
        url: String,
        message: String,
    },

    /// The pinned revision does not resolve to a commit after fetching.
    #[error("[{key}] unresolvable revision '{revision}': {message}")]
    UnresolvableRevision {
        key: String,
        revision: String,
        message: String,
    },

    /// The materialized working tree for a repository does not exist.
    ///
    /// Usually means `sync` has not been run yet.
    #[error("[{key}] working tree missing at {}: run sync first", path.display())]
    MissingWorkingTree { key: String, path: PathBuf },

    /// The working tree is not in a state the applier can safely patch.
    ///
    /// Raised when the tree is neither pristine at the pinned revision nor
    /// exactly up to date with the current patch queue. Re-syncing restores
    /// a known-good state; the applier never guesses.
    #[error("[{key}] dirty working tree: {message}")]
    DirtyWorkingTree { key: String, message: String },

    /// A patch in the queue failed to apply cleanly.
    ///
    /// Names the exact patch so the operator knows where the queue stopped.
    /// Later patches in the queue are not attempted.
    #[error("[{key}] patch '{patch}' failed to apply: {message}")]
    PatchConflict {
        key: String,
        patch: String,
        message: String,
    },

    /// Two distinct patch names compare equal under numeric-aware ordering,
    /// so the application order would be ambiguous.
    #[error("[{key}] ambiguous patch order: '{first}' and '{second}' sort identically")]
    AmbiguousPatchOrder {
        key: String,
        first: String,
        second: String,
    },

    /// A repository key was requested that is not present in the lock file.
    #[error("unknown repository '{key}' (not present in the lock file)")]
    UnknownRepository { key: String },

    /// A git invocation failed for a reason outside the taxonomy above.
    #[error("git command failed in {dir}: {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// An error occurred while reading or writing the patch store.
    #[error("Patch store error: {message}")]
    Store { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
