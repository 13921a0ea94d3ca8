//! End-to-end tests running the `tb` binary against a temporary snapshot.
//!
//! Every command runs with `HOME` pointed at a temp dir and `TZ=UTC` so
//! day boundaries are deterministic.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tb_binary() -> String {
    env!("CARGO_BIN_EXE_tb").to_string()
}

fn tb(home: &Path, args: &[&str]) -> Output {
    Command::new(tb_binary())
        .env("HOME", home)
        .env("TZ", "UTC")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("TB_SNAPSHOT_PATH")
        .env_remove("TB_BLOCK_DURATION")
        .args(args)
        .output()
        .expect("failed to run tb")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "tb should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    assert!(!output.status.success(), "tb should fail");
    String::from_utf8(output.stderr.clone()).unwrap()
}

/// Test the full flow: init → log → stats → day.
#[test]
fn test_log_then_report() {
    let temp = TempDir::new().unwrap();
    stdout(&tb(temp.path(), &["init"]));
    assert!(temp.path().join(".local/share/tb/snapshot.json").exists());

    let logged = stdout(&tb(
        temp.path(),
        &[
            "log",
            "--at",
            "2025-03-10T09:10:00Z",
            "--category",
            "work:meetings",
        ],
    ));
    assert_eq!(logged, "Logged 9:00 AM - 9:30 AM: Work · Meetings\n");

    let json = stdout(&tb(
        temp.path(),
        &["stats", "--from", "2025-03-10", "--to", "2025-03-10", "--json"],
    ));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    // Continued from 09:00 until midnight.
    assert_eq!(value["totalMinutes"], 900.0);
    assert_eq!(
        value["categories"]["default-work"]["subcategories"]["default-work-meetings"]["minutes"],
        900.0
    );

    let day = stdout(&tb(temp.path(), &["day", "--date", "2025-03-10"]));
    assert!(day.starts_with("Monday, March 10, 2025 (30 min blocks)"), "{day}");
    assert!(day.contains("   9:00 AM  Work · Meetings\n"), "{day}");
    assert!(day.contains("   9:30 AM  Work · Meetings · continued\n"), "{day}");
    assert!(day.ends_with("Logged: 15h\n"), "{day}");
}

/// Test that relogging a block edits its entry instead of adding one.
#[test]
fn test_relog_updates_entry() {
    let temp = TempDir::new().unwrap();
    let snapshot = temp.path().join("custom.json");
    let snapshot = snapshot.to_str().unwrap();
    stdout(&tb(temp.path(), &["--snapshot", snapshot, "init", "--duration", "60"]));

    let at = ["--at", "2025-03-10T14:05:00Z"];
    stdout(&tb(
        temp.path(),
        &["--snapshot", snapshot, "log", at[0], at[1], "--category", "default-meal"],
    ));
    let updated = stdout(&tb(
        temp.path(),
        &[
            "--snapshot",
            snapshot,
            "log",
            at[0],
            at[1],
            "--category",
            "default-social",
            "--category",
            "other:Board games",
        ],
    ));
    assert_eq!(
        updated,
        "Updated 2:00 PM - 3:00 PM: Social + Board games\n"
    );

    let content = std::fs::read_to_string(snapshot).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["entries"].as_array().unwrap().len(), 1);
    assert_eq!(value["profile"]["timeBlockDuration"], 60);

    let cleared = stdout(&tb(
        temp.path(),
        &["--snapshot", snapshot, "log", at[0], at[1], "--clear"],
    ));
    assert!(cleared.starts_with("Cleared entry "), "{cleared}");
}

/// Test that commands explain a missing snapshot.
#[test]
fn test_missing_snapshot_suggests_init() {
    let temp = TempDir::new().unwrap();
    let err = stderr(&tb(temp.path(), &["day"]));
    assert!(err.contains("Run 'tb init' first"), "{err}");
}

/// Test that future blocks cannot be logged.
#[test]
fn test_future_block_rejected() {
    let temp = TempDir::new().unwrap();
    stdout(&tb(temp.path(), &["init"]));

    let err = stderr(&tb(
        temp.path(),
        &["log", "--at", "2999-01-01T00:00:00Z", "--category", "default-work"],
    ));
    assert!(err.contains("has not started yet"), "{err}");
}

/// Test that categories list the stock set with Other last.
#[test]
fn test_categories_listing() {
    let temp = TempDir::new().unwrap();
    stdout(&tb(temp.path(), &["init"]));

    let json = stdout(&tb(temp.path(), &["categories", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let categories = value.as_array().unwrap();
    assert_eq!(categories.len(), 11);
    assert_eq!(categories[10]["id"], "default-other");
}

/// Test that the config file and environment select the block duration.
#[test]
fn test_block_duration_override() {
    let temp = TempDir::new().unwrap();
    stdout(&tb(temp.path(), &["init"]));
    let config = temp.path().join("tb.toml");
    std::fs::write(&config, "block_duration = 120\n").unwrap();

    let day = stdout(&tb(
        temp.path(),
        &["--config", config.to_str().unwrap(), "day", "--date", "2025-03-10"],
    ));
    assert!(day.starts_with("Monday, March 10, 2025 (2 hr blocks)"), "{day}");

    let output = Command::new(tb_binary())
        .env("HOME", temp.path())
        .env("TZ", "UTC")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("TB_SNAPSHOT_PATH")
        .env("TB_BLOCK_DURATION", "45")
        .args(["day"])
        .output()
        .unwrap();
    let err = stderr(&output);
    assert!(err.contains("invalid block duration"), "{err}");
}
