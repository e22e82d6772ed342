//! # Patch Store
//!
//! The ordered, named collection of patch files per repository key,
//! persisted under `patches/<key>/`. This *is* the patch queue: the order
//! in which patches apply is exactly the order of their names under the
//! numeric-aware comparison implemented here, so a `001-`/`002-` prefix
//! convention behaves the way a human expects (`2` sorts before `10`).
//!
//! The store is intentionally dumb storage: enumeration, read, and atomic
//! whole-namespace replacement. All apply and capture logic lives in the
//! applier and capturer, which keeps them testable against plain
//! directories.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::defaults::PATCH_EXTENSION;
use crate::error::{Error, Result};

/// One patch within a repository's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchFile {
    /// File name within the namespace; establishes queue order.
    pub name: String,
    /// The diff payload.
    pub content: Vec<u8>,
}

impl PatchFile {
    /// Deterministic digest of the patch content (SHA-256, hex).
    pub fn content_hash(&self) -> String {
        hex::encode(Sha256::digest(&self.content))
    }
}

/// Combined digest identifying an entire queue: order, names, and content.
///
/// Any rename, reorder, edit, addition, or removal changes this hash, which
/// is what makes the applied-state record a safe idempotence check.
pub fn queue_hash(patches: &[PatchFile]) -> String {
    let mut hasher = Sha256::new();
    for patch in patches {
        hasher.update(patch.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(patch.content_hash().as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// On-disk patch store rooted at the `patches/` directory.
#[derive(Debug, Clone)]
pub struct PatchStore {
    root: PathBuf,
}

impl PatchStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory holding the queue for `key`.
    pub fn namespace(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Absolute path of one patch inside a namespace.
    pub fn patch_path(&self, key: &str, name: &str) -> PathBuf {
        self.namespace(key).join(name)
    }

    /// The ordered patch queue for `key`.
    ///
    /// A missing namespace is an empty queue. Two distinct names that
    /// compare equal under the numeric-aware ordering make the application
    /// order ambiguous and are rejected as a configuration error.
    pub fn queue(&self, key: &str) -> Result<Vec<PatchFile>> {
        let dir = self.namespace(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(PATCH_EXTENSION) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            names.push(name);
        }

        names.sort_by(|a, b| natural_cmp(a, b).then_with(|| a.cmp(b)));
        for pair in names.windows(2) {
            if natural_cmp(&pair[0], &pair[1]) == Ordering::Equal {
                return Err(Error::AmbiguousPatchOrder {
                    key: key.to_string(),
                    first: pair[0].clone(),
                    second: pair[1].clone(),
                });
            }
        }

        let mut patches = Vec::with_capacity(names.len());
        for name in names {
            let content = fs::read(dir.join(&name))?;
            patches.push(PatchFile { name, content });
        }
        Ok(patches)
    }

    /// Atomically replace the entire queue for `key` with a single patch.
    ///
    /// The new namespace is staged in a sibling directory and swapped into
    /// place, so a crash mid-replace never leaves a half-written queue
    /// visible under the real namespace.
    pub fn replace(&self, key: &str, name: &str, content: &[u8]) -> Result<()> {
        let staging = self.root.join(format!(".{}.staging", key));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;
        fs::write(staging.join(name), content)?;

        let dir = self.namespace(key);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::rename(&staging, &dir).map_err(|e| Error::Store {
            message: format!(
                "failed to swap staged queue into {}: {}",
                dir.display(),
                e
            ),
        })?;
        Ok(())
    }
}

/// Compare two patch names with numeric awareness.
///
/// Runs of ASCII digits compare as integers (ignoring leading zeros);
/// everything else compares bytewise. `"002-x"` sorts before `"010-x"`,
/// and `"2-x"` sorts before `"10-x"`. Distinct names can compare equal
/// (`"001-x"` vs `"01-x"`); the store treats that as a configuration
/// error rather than picking an order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ab = a.as_bytes();
    let bb = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let si = i;
            while i < ab.len() && ab[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < bb.len() && bb[j].is_ascii_digit() {
                j += 1;
            }
            let na = a[si..i].trim_start_matches('0');
            let nb = b[sj..j].trim_start_matches('0');
            let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (ab.len() - i).cmp(&(bb.len() - j))
}
