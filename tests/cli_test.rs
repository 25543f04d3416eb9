//! CLI surface tests
//!
//! Exercises argument parsing and config loading through the real
//! binary, without touching a backend.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("covo").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("conversations"))
        .stdout(predicate::str::contains("models"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("covo").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("covo"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("covo").unwrap();
    cmd.arg("frobnicate");

    cmd.assert().failure();
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "api: [not, a, mapping]").unwrap();

    let mut cmd = Command::cargo_bin("covo").unwrap();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("conversations")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_invalid_api_url_override_fails() {
    let mut cmd = Command::cargo_bin("covo").unwrap();
    cmd.arg("--api-url")
        .arg("not a url")
        .arg("conversations")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid api.base_url"));
}
