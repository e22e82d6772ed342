//! # Lock Configuration
//!
//! This module defines the schema for `deps.lock.json`, the human-edited
//! artifact that pins every tracked upstream repository: where to fetch it
//! from, which exact revision to materialize, and where the working tree
//! lives relative to the checkout root.
//!
//! The lock file is the durable source of truth for a run. It is loaded
//! once, validated, and treated as immutable; only a human edits it between
//! runs. Everything derived from it (working trees, applied-state records)
//! is disposable.
//!
//! ## Format
//!
//! ```json
//! {
//!   "repos": {
//!     "client": {
//!       "url": "https://example.com/upstream/client.git",
//!       "rev": "4f2a9c11d6e8b0a7c3f5d9e2b8a4c6f1e3d5a7b9",
//!       "path": "src/client"
//!     }
//!   }
//! }
//! ```
//!
//! Keys are unique by construction (a JSON object cannot hold duplicates);
//! `path` must be a relative path that stays inside the checkout root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One tracked upstream repository, as pinned in the lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Remote address to clone from and fetch against.
    pub url: String,

    /// Pinned revision: a commit id (or any ref that resolves to one)
    /// defining the exact upstream snapshot.
    pub rev: String,

    /// Working tree location, relative to the checkout root.
    pub path: String,
}

/// The parsed lock artifact: repository key -> pinned entry.
///
/// A `BTreeMap` keeps iteration order deterministic, so reports and logs
/// come out the same on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LockFile {
    #[serde(default)]
    pub repos: BTreeMap<String, RepoEntry>,
}

impl LockFile {
    /// Parse and validate lock file content.
    pub fn parse(content: &str) -> Result<Self> {
        let lock: LockFile = serde_json::from_str(content).map_err(|e| Error::LockParse {
            message: e.to_string(),
            hint: Some(
                "expected {\"repos\": {\"<key>\": {\"url\": ..., \"rev\": ..., \"path\": ...}}}"
                    .to_string(),
            ),
        })?;
        lock.validate()?;
        Ok(lock)
    }

    /// Load and validate the lock file at `path`.
    ///
    /// A missing file is reported with a hint rather than a bare I/O error,
    /// since it is the most common first-run mistake.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::LockParse {
                message: format!("{} not found", path.display()),
                hint: Some(
                    "create a deps.lock.json in the patch system root (next to patches/)"
                        .to_string(),
                ),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Look up a single entry by key.
    pub fn get(&self, key: &str) -> Result<&RepoEntry> {
        self.repos
            .get(key)
            .ok_or_else(|| Error::UnknownRepository {
                key: key.to_string(),
            })
    }

    fn validate(&self) -> Result<()> {
        for (key, entry) in &self.repos {
            if key.trim().is_empty() {
                return Err(invalid("repository keys must be non-empty"));
            }
            if key.contains('/') || key.contains('\\') {
                return Err(Error::LockParse {
                    message: format!("repository key '{}' contains a path separator", key),
                    hint: Some("keys name patch namespaces and must be plain names".to_string()),
                });
            }
            if entry.url.trim().is_empty() {
                return Err(invalid(&format!("repo '{}' has an empty url", key)));
            }
            if entry.rev.trim().is_empty() {
                return Err(invalid(&format!("repo '{}' has an empty rev", key)));
            }
            if entry.path.trim().is_empty() {
                return Err(invalid(&format!("repo '{}' has an empty path", key)));
            }

            let path = Path::new(&entry.path);
            if path.is_absolute() {
                return Err(Error::LockParse {
                    message: format!("repo '{}' has an absolute path '{}'", key, entry.path),
                    hint: Some("paths are relative to the checkout root".to_string()),
                });
            }
            if path.components().any(|c| c == Component::ParentDir) {
                return Err(Error::LockParse {
                    message: format!("repo '{}' path '{}' escapes the checkout root", key, entry.path),
                    hint: Some("remove '..' components from the path".to_string()),
                });
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::LockParse {
        message: message.to_string(),
        hint: None,
    }
}
