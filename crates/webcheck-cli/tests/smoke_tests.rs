//! Smoke tests for the webcheck CLI
//!
//! None of these reach the public services: runs point the API at a closed
//! local port.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CLOSED_API: &str = "http://127.0.0.1:9/posts";

/// Get a command for the webcheck binary, isolated from any local config
fn webcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("webcheck").expect("webcheck binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("BASE_URL")
        .env_remove("API_URL");
    cmd
}

// ============================================================================
// Manifest
// ============================================================================

#[test]
fn test_cli_has_no_direct_serde_dependency() {
    let manifest = include_str!("../Cargo.toml");
    assert!(!manifest.lines().any(|l| l.starts_with("serde =")));
    assert!(manifest.lines().any(|l| l.starts_with("serde_json =")));
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir).assert().failure();
}

#[test]
fn test_run_help_lists_options() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--suite"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--headed"));
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_all() {
    let dir = TempDir::new().unwrap();
    let output = webcheck(&dir).arg("list").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 17);
    assert!(stdout.contains("ui\tValidate dynamic loading functionality"));
}

#[test]
fn test_list_api_only() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .args(["list", "--suite", "api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ui\t").not())
        .stdout(predicate::str::contains("(mocked)"));
}

#[test]
fn test_invalid_suite_rejected() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .args(["list", "--suite", "smoke"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ============================================================================
// Run Tests
// ============================================================================

#[test]
fn test_run_with_missing_config_file() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .args(["run", "--config", "absent.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_run_filter_matching_nothing() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .args(["run", "--filter", "no such case"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no test case matches"));
}

#[test]
fn test_unreachable_api_exits_non_zero_with_json() {
    let dir = TempDir::new().unwrap();
    let output = webcheck(&dir)
        .env("API_URL", CLOSED_API)
        .args([
            "run",
            "--suite",
            "api",
            "--filter",
            "return 200 OK status",
            "--format",
            "json",
        ])
        .assert()
        .code(1);
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["suite_name"], "api");
    assert_eq!(report["results"].as_array().unwrap().len(), 1);
    assert_eq!(report["results"][0]["passed"], false);
}

#[test]
fn test_json_mode_sends_case_lines_to_stderr() {
    let dir = TempDir::new().unwrap();
    let output = webcheck(&dir)
        .env("API_URL", CLOSED_API)
        .args([
            "--color",
            "never",
            "run",
            "--suite",
            "api",
            "--filter",
            "invalid post ID",
            "--format",
            "json",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FAIL"));
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.trim_start().starts_with('{'));
    assert!(!stdout.contains("FAIL "));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["results"][0]["passed"], false);
}

#[test]
fn test_unreachable_api_text_summary() {
    let dir = TempDir::new().unwrap();
    webcheck(&dir)
        .env("API_URL", CLOSED_API)
        .args(["--color", "never", "run", "--suite", "api", "--filter", "invalid post ID"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn test_yaml_config_is_honoured() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("webcheck.yaml"),
        format!("api_url: {CLOSED_API}\n"),
    )
    .unwrap();
    webcheck(&dir)
        .args([
            "run",
            "--suite",
            "api",
            "--filter",
            "return 200 OK status",
            "--format",
            "json",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"passed\": false"));
}
