//! Default names and layout constants for the patch system root.
//!
//! This module centralizes the on-disk artifact names used across the
//! engine and the CLI, ensuring consistency and avoiding duplication.

/// Name of the lock artifact inside the patch system root.
pub const LOCK_FILE_NAME: &str = "deps.lock.json";

/// Directory under the patch system root holding per-repository patch
/// namespaces (`patches/<key>/*.patch`).
pub const PATCHES_DIR: &str = "patches";

/// Directory under the patch system root holding auto-generated
/// applied-state records (`patchinfo/<key>.json`). Safe to delete; a
/// deleted record just forces a full re-apply on the next run.
pub const PATCHINFO_DIR: &str = "patchinfo";

/// File extension recognized as a patch inside a namespace.
pub const PATCH_EXTENSION: &str = "patch";

/// Name of the single consolidated patch written by the capturer.
///
/// The numeric prefix keeps the ordering convention meaningful if an
/// operator later splits the queue by hand.
pub const CAPTURE_PATCH_NAME: &str = "001-local-changes.patch";
