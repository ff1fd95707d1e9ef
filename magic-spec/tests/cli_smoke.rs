//! CLI smoke tests: every mode runs and reports through the expected
//! surface without touching the network.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn magic_cmd() -> Command {
    cargo_bin_cmd!("magic-spec")
}

#[test]
fn help_flag_works() {
    magic_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
    magic_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn subcommand_help_works() {
    for cmd in &["install", "update", "doctor", "check", "info", "eject", "list-envs"] {
        magic_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
fn list_envs_prints_adapters_and_default() {
    magic_cmd()
        .arg("list-envs")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("cursor")
                .and(predicate::str::contains("gemini"))
                .and(predicate::str::contains("default")),
        );
}

#[test]
fn check_reports_not_initialized() {
    let project = TempDir::new().unwrap();
    magic_cmd()
        .current_dir(project.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("not initialized"));
}

#[test]
fn info_reports_unknown_engine_version() {
    let project = TempDir::new().unwrap();
    magic_cmd()
        .current_dir(project.path())
        .arg("info")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Project Engine vUnknown")
                .and(predicate::str::contains("Current Path:")),
        );
}

#[test]
fn doctor_fails_cleanly_without_an_installation() {
    let project = TempDir::new().unwrap();
    magic_cmd()
        .current_dir(project.path())
        .arg("doctor")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn install_from_missing_source_is_fatal() {
    let project = TempDir::new().unwrap();
    magic_cmd()
        .current_dir(project.path())
        .args(["install", "--source", "/no/such/payload", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
