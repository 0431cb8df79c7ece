//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("carlot").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("init-db"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("carlot").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Port to listen on"))
        .stdout(predicate::str::contains("DB_HOST"))
        .stdout(predicate::str::contains("DB_NAME"));
}

#[test]
fn test_init_db_help() {
    let mut cmd = Command::cargo_bin("carlot").unwrap();
    cmd.arg("init-db").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Database (schema) name"));
}

#[test]
fn test_serve_requires_database_name() {
    let mut cmd = Command::cargo_bin("carlot").unwrap();
    cmd.env_remove("DB_NAME")
        .current_dir(std::env::temp_dir())
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--db-name"));
}

#[test]
fn test_serve_reaches_database_with_env_config() {
    // Nothing listens on port 1, so startup gets as far as the pool
    let mut cmd = Command::cargo_bin("carlot").unwrap();
    cmd.current_dir(std::env::temp_dir())
        .env("DB_NAME", "cars")
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("DB_ACQUIRE_TIMEOUT_SECS", "1")
        .env("PORT", "8080")
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create database pool"));
}
