//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture that builds real upstream git
//! repositories and a product tree (patch system root plus checkout root)
//! inside a temp directory, so the engine can be exercised end to end the
//! way it runs in production.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then:
//!
//! ```rust,ignore
//! mod common;
//! use common::Fixture;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = Fixture::new();
//!     let upstream = fixture.upstream("dep");
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, Fixture, UpstreamRepo};
}

/// Run git in `dir`, panicking on failure, returning trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} in {} failed: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A scratch upstream repository the fixture's lock file can pin.
pub struct UpstreamRepo {
    pub path: PathBuf,
}

impl UpstreamRepo {
    fn init(path: PathBuf) -> Self {
        fs::create_dir_all(&path).unwrap();
        git(&path, &["init", "--quiet"]);
        git(&path, &["config", "user.email", "test@example.com"]);
        git(&path, &["config", "user.name", "Tester"]);
        Self { path }
    }

    /// The clone URL for lock entries (a plain local path).
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Stage everything and commit, returning the new commit id.
    pub fn commit_all(&self, message: &str) -> String {
        git(&self.path, &["add", "-A"]);
        git(&self.path, &["commit", "--quiet", "-m", message]);
        self.head()
    }

    pub fn head(&self) -> String {
        git(&self.path, &["rev-parse", "HEAD"])
    }

    /// Diff of the current (uncommitted) working tree against HEAD.
    pub fn worktree_diff(&self) -> String {
        // Do not go through `git()`: trimming the output would strip the
        // final newline and corrupt the patch.
        let output = Command::new("git")
            .args(["diff", "HEAD"])
            .current_dir(&self.path)
            .output()
            .unwrap_or_else(|e| panic!("failed to spawn git diff: {}", e));
        assert!(
            output.status.success(),
            "git diff HEAD in {} failed: {}",
            self.path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Discard uncommitted changes and point the branch back at `rev`.
    pub fn reset_to(&self, rev: &str) {
        git(&self.path, &["reset", "--hard", rev]);
    }
}

/// A product tree: `product/patch_system/` (lock, patches, patchinfo) with
/// working trees materialized under `product/`.
pub struct Fixture {
    temp: tempfile::TempDir,
    pub product: PathBuf,
    pub system: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = tempfile::TempDir::new().unwrap();
        let product = temp.path().join("product");
        let system = product.join("patch_system");
        fs::create_dir_all(&system).unwrap();
        Self {
            temp,
            product,
            system,
        }
    }

    /// Create a fresh upstream repository under the fixture's temp dir.
    pub fn upstream(&self, name: &str) -> UpstreamRepo {
        UpstreamRepo::init(self.temp.path().join("upstream").join(name))
    }

    /// Write `deps.lock.json` from `(key, url, rev, path)` tuples.
    pub fn write_lock(&self, entries: &[(&str, &str, &str, &str)]) {
        let mut repos = serde_json::Map::new();
        for (key, url, rev, path) in entries {
            repos.insert(
                (*key).to_string(),
                serde_json::json!({ "url": url, "rev": rev, "path": path }),
            );
        }
        let lock = serde_json::json!({ "repos": repos });
        fs::write(
            self.system.join("deps.lock.json"),
            serde_json::to_string_pretty(&lock).unwrap(),
        )
        .unwrap();
    }

    /// Seed a patch file in the store namespace for `key`.
    pub fn write_patch(&self, key: &str, name: &str, content: &str) {
        let dir = self.system.join("patches").join(key);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    /// Path of the applied-state record for `key`.
    pub fn state_record(&self, key: &str) -> PathBuf {
        self.system.join("patchinfo").join(format!("{}.json", key))
    }

    /// Path of a materialized working tree, relative to the checkout root.
    pub fn tree(&self, rel: &str) -> PathBuf {
        self.product.join(rel)
    }

    /// Load the engine for this fixture.
    pub fn project(&self) -> patchlock::engine::Project {
        patchlock::engine::Project::load(&self.system, None).unwrap()
    }
}
