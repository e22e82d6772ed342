//! # Patchlock Library
//!
//! Core engine for maintaining a reproducible set of source modifications
//! ("patches") on top of pinned revisions of external upstream
//! repositories, without forking them. It is used by the `patchlock`
//! command-line tool but can also be embedded by other build tooling.
//!
//! ## Quick Example
//!
//! ```
//! use patchlock::lock::LockFile;
//! use patchlock::store::natural_cmp;
//!
//! let lock = LockFile::parse(r#"{
//!     "repos": {
//!         "client": {
//!             "url": "https://example.com/client.git",
//!             "rev": "4f2a9c1",
//!             "path": "src/client"
//!         }
//!     }
//! }"#).unwrap();
//! assert_eq!(lock.get("client").unwrap().path, "src/client");
//!
//! // Patch queues order numerically, not lexicographically.
//! assert!(natural_cmp("2-fix.patch", "10-fix.patch").is_lt());
//! ```
//!
//! ## Core Concepts
//!
//! - **Lock Configuration (`lock`)**: the human-edited `deps.lock.json`
//!   pinning each upstream repository to an exact revision and a local
//!   working tree path.
//! - **Patch Store (`store`)**: the ordered, named queue of patch files per
//!   repository key under `patches/<key>/`.
//! - **Applied-State Tracker (`state`)**: derived, disposable records of
//!   which queue content was last applied, keyed by content hash, making
//!   re-runs idempotent.
//! - **Syncer (`sync`)**: materializes each working tree pristine at its
//!   pinned revision, discarding local modifications.
//! - **Applier (`apply`)**: applies the queue in order to a pristine tree,
//!   stopping at the first conflict.
//! - **Capturer (`capture`)**: collapses the current working tree delta
//!   into one consolidated patch that replaces the queue.
//! - **Engine (`engine`)**: runs any of the above across all lock entries
//!   in parallel and aggregates per-repository results.
//!
//! ## Execution Flow
//!
//! Sync materializes pristine trees from the lock, apply layers the patch
//! queue on top, development happens in the patched trees, and capture
//! folds the result back into the patch store for the next cycle.
//! Working trees and applied-state records are regenerable derived state;
//! the lock file and patch store are the durable sources of truth.

pub mod apply;
pub mod capture;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod git;
pub mod lock;
pub mod output;
pub mod state;
pub mod store;
pub mod sync;
