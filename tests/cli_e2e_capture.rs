//! End-to-end tests for the `capture` command
//!
//! These tests invoke the actual CLI binary and validate its behavior
//! from a user's perspective.

mod common;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

use common::Fixture;

/// Test that --help flag shows help information
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_capture_help() {
    let mut cmd = cargo_bin_cmd!("patchlock");

    cmd.arg("capture")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("consolidated patch"));
}

/// Test that an unknown repository key produces an error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_capture_unknown_key() {
    let fixture = Fixture::new();
    fixture.write_lock(&[]);

    let mut cmd = cargo_bin_cmd!("patchlock");

    cmd.arg("capture")
        .arg("nope")
        .arg("--dir")
        .arg(&fixture.system)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown repository 'nope'"));
}

/// Test that capturing a pristine tree reports no changes
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_capture_pristine_tree() {
    let fixture = Fixture::new();
    let upstream = fixture.upstream("dep");
    upstream.write("dummy.txt", "v1\n");
    let rev = upstream.commit_all("initial");
    fixture.write_lock(&[("dep", &upstream.url(), &rev, "src/dep")]);

    let mut sync = cargo_bin_cmd!("patchlock");
    sync.arg("sync")
        .arg("--yes")
        .arg("--dir")
        .arg(&fixture.system)
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("patchlock");
    cmd.arg("capture")
        .arg("--dir")
        .arg(&fixture.system)
        .assert()
        .success()
        .stdout(predicate::str::contains("dep: no changes to capture"));
}

/// Test the full sync, modify, capture cycle through the binary
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_capture_writes_consolidated_patch() {
    let fixture = Fixture::new();
    let upstream = fixture.upstream("dep");
    upstream.write("code.txt", "one\ntwo\n");
    let rev = upstream.commit_all("initial");
    fixture.write_lock(&[("dep", &upstream.url(), &rev, "src/dep")]);

    let mut sync = cargo_bin_cmd!("patchlock");
    sync.arg("sync")
        .arg("--yes")
        .arg("--dir")
        .arg(&fixture.system)
        .assert()
        .success();

    fs::write(fixture.tree("src/dep").join("code.txt"), "one\ntwo\nthree\n").unwrap();

    let mut cmd = cargo_bin_cmd!("patchlock");
    cmd.arg("capture")
        .arg("dep")
        .arg("--dir")
        .arg(&fixture.system)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "dep: captured delta into 001-local-changes.patch",
        ));

    let patch = fixture
        .system
        .join("patches/dep/001-local-changes.patch");
    let text = fs::read_to_string(patch).unwrap();
    assert!(text.contains("code.txt"));
    assert!(text.contains("+three"));
}
