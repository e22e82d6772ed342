//! Thin wrapper around the system `git` command.
//!
//! All repository plumbing goes through the user's own `git` binary, which
//! automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Every helper here is a single git invocation with captured stderr; the
//! callers in `sync`, `apply`, and `capture` translate failures into the
//! engine's error taxonomy. Nothing in this module creates commits: patch
//! application and capture operate on the working tree only.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Run git with `args` inside `dir`, failing on a non-zero exit status.
fn run(dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("git {}", args.join(" ")),
            dir: dir.display().to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::GitCommand {
            command: format!("git {}", args.join(" ")),
            dir: dir.display().to_string(),
            stderr,
        });
    }

    Ok(output)
}

fn stdout_line(output: Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Whether `dir` looks like a materialized git working tree.
pub fn is_work_tree(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Clone `url` into `target`, creating parent directories as needed.
///
/// Runs from the parent directory because the target itself does not exist
/// yet.
pub fn clone(url: &str, target: &Path) -> Result<()> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let target_str = target.to_string_lossy();
    run(parent, &["clone", url, &target_str])?;
    Ok(())
}

/// Fetch updates for the default remote into an existing repository.
pub fn fetch(dir: &Path) -> Result<()> {
    run(dir, &["fetch", "origin"])?;
    Ok(())
}

/// Resolve `rev` to a full commit id, verifying it exists locally.
pub fn resolve_commit(dir: &Path, rev: &str) -> Result<String> {
    let spec = format!("{}^{{commit}}", rev);
    let output = run(dir, &["rev-parse", "--verify", &spec])?;
    Ok(stdout_line(output))
}

/// The commit id the working tree is currently checked out at.
pub fn head_commit(dir: &Path) -> Result<String> {
    let output = run(dir, &["rev-parse", "HEAD"])?;
    Ok(stdout_line(output))
}

/// Check out `rev` detached (never a branch).
pub fn checkout_detached(dir: &Path, rev: &str) -> Result<()> {
    run(dir, &["checkout", "--detach", rev])?;
    Ok(())
}

/// Discard staged and unstaged changes to tracked files.
pub fn reset_hard(dir: &Path) -> Result<()> {
    run(dir, &["reset", "--hard", "HEAD"])?;
    Ok(())
}

/// Remove untracked files and directories, including ignored ones.
pub fn clean_untracked(dir: &Path) -> Result<()> {
    run(dir, &["clean", "-fdx"])?;
    Ok(())
}

/// Porcelain status output; empty means the tree is pristine.
pub fn status_porcelain(dir: &Path) -> Result<String> {
    let output = run(dir, &["status", "--porcelain"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Apply one patch file to the working tree.
///
/// Uses `--3way` so a patch with recorded blob identities can still land
/// when the direct application has drifted slightly; a conflicted 3-way
/// merge exits non-zero and surfaces as an error here. No commit is made.
pub fn apply_patch(dir: &Path, patch: &Path) -> Result<()> {
    let patch_str = patch.to_string_lossy();
    run(dir, &["apply", "--3way", "--whitespace=nowarn", &patch_str])?;
    Ok(())
}

/// Unstage everything, leaving working tree contents intact.
///
/// Three-way application can stage paths as a side effect; the engine keeps
/// the index clean so the working tree is the only unit of truth.
pub fn reset_index(dir: &Path) -> Result<()> {
    run(dir, &["reset", "--quiet", "HEAD"])?;
    Ok(())
}

/// Full binary diff of the working tree (plus staged paths) against HEAD.
///
/// Untracked, unstaged files are not part of this diff, which is exactly
/// the exclusion the capturer wants.
pub fn diff_head(dir: &Path) -> Result<Vec<u8>> {
    let output = run(dir, &["diff", "HEAD", "--binary"])?;
    Ok(output.stdout)
}
