//! Integration tests for the `blinkly` binary.
//!
//! Argument parsing, help output, shell completions and configuration
//! errors, all without reaching the Blink cloud.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// A `blinkly` command isolated from the user's environment, reading its
/// config from `config`.
fn blinkly_cmd(config: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("blinkly");
    cmd.env("BLINK_CONFIG", config)
        .env("HOME", "/tmp/blinkly-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/blinkly-test-nonexistent")
        .env_remove("BLINK_PROFILE")
        .env_remove("BLINK_EMAIL")
        .env_remove("BLINK_NETWORK")
        .env_remove("BLINK_OUTPUT")
        .env_remove("BLINK_TIMEOUT")
        .env_remove("BLINK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn missing_config() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let (_dir, path) = missing_config();
    let output = blinkly_cmd(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "expected usage text:\n{text}");
}

#[test]
fn help_lists_commands() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path).arg("--help").assert().success().stdout(
        predicate::str::contains("cameras")
            .and(predicate::str::contains("networks"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn version_flag() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("blinkly"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path).arg("doorbells").assert().code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_bash() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blinkly"));
}

#[test]
fn completions_zsh() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn config_path_honours_env() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_string_lossy().as_ref()));
}

#[test]
fn missing_config_is_usage_error() {
    let (_dir, path) = missing_config();
    blinkly_cmd(&path)
        .args(["cameras", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn unknown_profile_is_usage_error() {
    let (_dir, path) = missing_config();
    std::fs::write(
        &path,
        "default_profile = \"home\"\n\n[profiles.home]\nemail = \"foo@example.com\"\npassword = \"x\"\n",
    )
    .unwrap();

    blinkly_cmd(&path)
        .args(["--profile", "cabin", "networks", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cabin").and(predicate::str::contains("home")));
}

#[test]
fn profile_without_email_is_rejected() {
    let (_dir, path) = missing_config();
    std::fs::write(&path, "[profiles.default]\nemail = \"\"\npassword = \"x\"\n").unwrap();

    blinkly_cmd(&path)
        .args(["cameras", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("email"));
}

#[test]
fn config_show_redacts_password() {
    let (_dir, path) = missing_config();
    std::fs::write(
        &path,
        "[profiles.default]\nemail = \"foo@example.com\"\npassword = \"deadbeef\"\n",
    )
    .unwrap();

    blinkly_cmd(&path)
        .args(["config", "show", "--output", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("foo@example.com")
                .and(predicate::str::contains("deadbeef").not()),
        );
}
