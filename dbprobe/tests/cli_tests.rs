//! Tests that run the dbprobe binary and check its stdout and exit status
//!
//! Every run gets an explicit `--config` file so the user's and the
//! system's config files never leak in.
#![cfg(unix)]

mod helpers;

use assert_cmd::prelude::*;
use helpers::{write_script, FAKE_MYSQL};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Should write config file");
    path
}

/// Config pointing the client backend at `mysql`
fn client_config(dir: &TempDir, mysql: &Path) -> PathBuf {
    write_config(
        dir,
        &format!("[client]\nbinary = '{}'\n", mysql.display()),
    )
}

fn run_dbprobe(config: &Path, args: &[&str]) -> Output {
    Command::cargo_bin("dbprobe")
        .expect("dbprobe binary should be built")
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("DBPROBE_DATABASES")
        .env_remove("DBPROBE_BACKEND")
        .env_remove("DBPROBE_MYSQL_BIN")
        .env_remove("DBPROBE_LOG")
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Should run dbprobe")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

#[test]
#[serial]
fn test_unparsable_config_bails_out_on_one_line() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "databases = [unterminated\n");

    let output = run_dbprobe(&config, &[]);
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(255));
    assert_eq!(stdout.lines().count(), 1, "stdout was: {}", stdout);
    assert!(stdout.starts_with("Bail out! Configuration error: "), "{}", stdout);
    assert!(stdout.contains("Invalid TOML"), "{}", stdout);

    // Full multi-line error goes to stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated"), "stderr was: {}", stderr);
}

#[test]
#[serial]
fn test_invalid_database_name_bails_out() {
    let dir = TempDir::new().unwrap();
    let mysql = write_script(&dir, "mysql", FAKE_MYSQL);
    let config = client_config(&dir, &mysql);

    let output = run_dbprobe(&config, &["--database", "schema.table"]);
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(255));
    assert_eq!(stdout.lines().count(), 1, "stdout was: {}", stdout);
    assert!(stdout.starts_with("Bail out! "));
    // Nothing was queried
    assert!(!dir.path().join("invocations.log").exists());
}

#[test]
#[serial]
fn test_missing_database_exits_with_failure_count() {
    let dir = TempDir::new().unwrap();
    let mysql = write_script(&dir, "mysql", FAKE_MYSQL);
    let config = client_config(&dir, &mysql);

    let output = run_dbprobe(&config, &["--database", "api_staging"]);
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(2), "stdout was: {}", stdout);
    assert!(stdout.starts_with("1..2\n"));
    assert!(stdout.contains("not ok 1 - Checking if database exists\n"));
    assert!(stdout.contains("not ok 2 - Checking if tables in database api_staging\n"));
    assert!(stdout.ends_with("# Looks like you failed 2 tests of 2.\n"));
}

#[test]
#[serial]
fn test_passing_run_exits_zero() {
    let dir = TempDir::new().unwrap();
    let mysql = write_script(&dir, "mysql", FAKE_MYSQL);
    let config = client_config(&dir, &mysql);

    let output = run_dbprobe(&config, &["--database", "api_production"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_of(&output),
        "1..2\n\
         ok 1 - Checking if database exists\n\
         ok 2 - Checking if tables in database api_production\n"
    );
}

#[test]
#[serial]
fn test_default_database_from_config() {
    let dir = TempDir::new().unwrap();
    let mysql = write_script(&dir, "mysql", FAKE_MYSQL);
    let config = client_config(&dir, &mysql);

    // No --database: falls back to api_production
    let output = run_dbprobe(&config, &[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("ok 2 - Checking if tables in database api_production\n"));
}
