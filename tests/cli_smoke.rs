#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! These tests ensure that the binary starts correctly and responds to
//! basic commands without touching the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn elarion() -> Command {
    Command::cargo_bin("elarion").unwrap()
}

/// A command isolated from the developer's own config and secrets.
fn isolated(temp_dir: &TempDir) -> Command {
    let mut cmd = elarion();
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("XDG_DATA_HOME", temp_dir.path().join("data"))
        .env_remove("BOT_TOKEN")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_displays_usage() {
    elarion()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Telegram translation bot with history and usage statistics",
        ))
        .stdout(predicate::str::contains("console"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--db"));
}

#[test]
fn test_version_displays_version() {
    elarion()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_list() {
    elarion()
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("en"))
        .stdout(predicate::str::contains("ja"))
        .stdout(predicate::str::contains("zh-TW"));
}

#[test]
fn test_console_help() {
    elarion()
        .args(["console", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--user-id"))
        .stdout(predicate::str::contains("--name"));
}

#[test]
fn test_config_init_writes_template_once() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("elarion.toml");

    isolated(&temp_dir)
        .args(["config", "--init", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("[provider]"));

    isolated(&temp_dir)
        .args(["config", "--init", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_init_and_show_conflict() {
    elarion()
        .args(["config", "--init", "--show"])
        .assert()
        .failure();
}

#[test]
fn test_config_show_masks_secrets() {
    let temp_dir = TempDir::new().unwrap();

    isolated(&temp_dir)
        .env("GOOGLE_API_KEY", "super-secret-key")
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration"))
        .stdout(predicate::str::contains("(set)"))
        .stdout(predicate::str::contains("super-secret-key").not());
}

#[test]
fn test_run_without_api_key_fails() {
    let temp_dir = TempDir::new().unwrap();

    isolated(&temp_dir)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires an API key"));
}

#[test]
fn test_run_without_bot_token_fails() {
    let temp_dir = TempDir::new().unwrap();

    isolated(&temp_dir)
        .env("GOOGLE_API_KEY", "key")
        .arg("--db")
        .arg(temp_dir.path().join("trans.db"))
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bot token"))
        .stderr(predicate::str::contains("BOT_TOKEN"));
}
