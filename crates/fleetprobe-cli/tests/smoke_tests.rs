//! Smoke tests for the fleetprobe CLI

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the fleetprobe binary with no suite overrides from the environment
fn fleetprobe() -> Command {
    let mut cmd = Command::cargo_bin("fleetprobe").expect("fleetprobe binary should exist");
    for var in [
        "FLEETPROBE_CONFIG",
        "FLEETPROBE_BASE_URL",
        "FLEETPROBE_USERNAME",
        "FLEETPROBE_PASSWORD",
        "FLEETPROBE_TIMEOUT_MS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    fleetprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    fleetprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("date"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_no_args_fails() {
    fleetprobe().assert().failure();
}

// ============================================================================
// Generate
// ============================================================================

#[test]
fn test_generate_medallions() {
    let output = fleetprobe()
        .args(["generate", "medallion", "-n", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let pattern = regex::Regex::new(r"^[0-9][A-Z][0-9]{2}$").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| pattern.is_match(l)), "{text}");
}

#[test]
fn test_generate_seed_is_reproducible() {
    let run = || {
        fleetprobe()
            .args(["generate", "dmv", "-n", "3", "--seed", "42"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_generate_vin_alphabet() {
    fleetprobe()
        .args(["generate", "vin", "-n", "20", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^([A-HJ-NPR-Z0-9]{17}\n){20}$").unwrap());
}

#[test]
fn test_generate_zero_count_fails() {
    fleetprobe()
        .args(["generate", "vin", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--count"));
}

// ============================================================================
// Date
// ============================================================================

#[test]
fn test_date_canonical() {
    fleetprobe()
        .args(["date", "2025", "Jan", "3"])
        .assert()
        .success()
        .stdout("01/03/2025\n");
}

#[test]
fn test_date_bad_month() {
    fleetprobe()
        .args(["date", "2025", "Janember", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_masks_password() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(
        &path,
        "base_url: https://fleet.example.test\ncredentials:\n  username: dispatcher\n  password: hunter2\n",
    )
    .unwrap();

    fleetprobe()
        .args(["config", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://fleet.example.test"))
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_env_override() {
    fleetprobe()
        .arg("config")
        .env("FLEETPROBE_BASE_URL", "https://staging.fleet.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://staging.fleet.test"));
}

#[test]
fn test_config_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    fleetprobe()
        .args(["config", "--file"])
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure();
}

// ============================================================================
// Login
// ============================================================================

#[cfg(not(feature = "browser"))]
#[test]
fn test_login_requires_browser_feature() {
    fleetprobe()
        .args(["login", "--no-sandbox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("browser"));
}
