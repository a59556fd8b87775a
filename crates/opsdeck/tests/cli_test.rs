//! Integration tests for the `opsdeck` CLI binary.
//!
//! These tests validate argument parsing, help output, and shell
//! completions -- all without requiring a live server.
#![allow(clippy::unwrap_used)]

use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `opsdeck` binary with env isolation.
///
/// Clears all `OPSDECK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn opsdeck_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("opsdeck").unwrap();
    cmd.env("HOME", "/tmp/opsdeck-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/opsdeck-cli-test-nonexistent")
        .env_remove("OPSDECK_PROFILE")
        .env_remove("OPSDECK_SERVER")
        .env_remove("OPSDECK_USERNAME")
        .env_remove("OPSDECK_PASSWORD")
        .env_remove("OPSDECK_OUTPUT")
        .env_remove("OPSDECK_INSECURE")
        .env_remove("OPSDECK_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = opsdeck_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    opsdeck_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("administration server")
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("tickets"))
            .and(predicate::str::contains("projects")),
    );
}

#[test]
fn test_version_flag() {
    opsdeck_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("opsdeck"));
}

#[test]
fn test_unknown_subcommand_fails() {
    opsdeck_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

// ── Subcommand help ─────────────────────────────────────────────────

#[test]
fn test_users_help_lists_operations() {
    opsdeck_cmd().args(["users", "--help"]).assert().success().stdout(
        predicate::str::contains("list").and(predicate::str::contains("reset-password")),
    );
}

#[test]
fn test_projects_help_lists_board_operations() {
    opsdeck_cmd()
        .args(["projects", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("board")
                .and(predicate::str::contains("move-task"))
                .and(predicate::str::contains("move-section")),
        );
}

#[test]
fn test_move_task_requires_section() {
    let output = opsdeck_cmd()
        .args(["projects", "move-task", "p1", "t1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("--section"),
        "Expected missing-flag error mentioning --section:\n{text}"
    );
}

// ── Config plumbing ─────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    opsdeck_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_connectionless_commands_need_credentials() {
    // No config file, no flags: a server-bound command must fail with
    // a configuration error, not attempt a connection.
    let output = opsdeck_cmd().args(["users", "list"]).output().unwrap();
    assert!(!output.status.success());
}

// ── Completions ─────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    opsdeck_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("opsdeck"));
}
