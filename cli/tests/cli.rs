//! # NSAKCET Chatbot CLI Integration Tests
//!
//! File: cli/tests/cli.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Runs the compiled binary: help and version output, the `check`
//! subcommand's exit codes, and the `chat` subcommand in one-shot and
//! interactive modes. `serve` blocks until a signal arrives, so only its
//! startup failures are exercised here.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_main_help_flag() {
    chatbot_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn test_main_version_flag() {
    chatbot_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    chatbot_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_check_bundled_assets() {
    chatbot_cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_check_missing_files_exits_1() {
    let dir = tempdir().unwrap();
    copy_bundled_assets(dir.path());
    fs::remove_file(dir.path().join("static/css/style.css")).unwrap();

    chatbot_cmd()
        .args(["check", "--static-dir"])
        .arg(dir.path().join("static"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Missing."))
        .stderr(predicate::str::contains("style.css"));
}

#[test]
fn test_check_invalid_catalog_exits_1() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("intents.json");
    fs::write(
        &catalog,
        r#"{"intents": [{"tag": "greeting", "patterns": [], "responses": ["Hi"]}]}"#,
    )
    .unwrap();

    chatbot_cmd()
        .args(["check", "--intents"])
        .arg(&catalog)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_check_reads_config_file() {
    let dir = tempdir().unwrap();
    copy_bundled_assets(dir.path());
    let config = dir.path().join("chatbot.toml");
    fs::write(
        &config,
        r#"
        [assets]
        intents = "intents.json"
        template = "templates/index.html"
        static_dir = "static"

        [site]
        institution = "NSAKCET Test"
        "#,
    )
    .unwrap();

    chatbot_cmd()
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Using configuration file"));
}

#[test]
fn test_check_rejects_bad_threshold() {
    chatbot_cmd()
        .args(["check", "--threshold", "2.5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn test_chat_single_message() {
    chatbot_cmd()
        .args(["chat", "--selection", "first", "--message", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to NSAKCET"));
}

#[test]
fn test_chat_single_message_affiliation() {
    chatbot_cmd()
        .args(["chat", "-m", "What is the affiliation?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Osmania"));
}

#[test]
fn test_chat_interactive_session() {
    chatbot_cmd()
        .args(["chat", "--selection", "first"])
        .write_stdin("What are the fees?\nxyzabc123random\nbye\nHello\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("₹75,000"))
        .stdout(predicate::str::contains("sorry"))
        .stdout(predicate::str::contains("Bot: Goodbye!"))
        .stdout(predicate::str::contains("Welcome to NSAKCET").not());
}

#[test]
fn test_serve_missing_catalog_exits_1() {
    let dir = tempdir().unwrap();
    chatbot_cmd()
        .args(["serve", "--server", "dev", "--intents"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Required files are missing"));
}

#[test]
fn test_check_from_workspace_root_finds_bundled_assets() {
    let workspace_root = package_dir()
        .parent()
        .expect("package should live inside the workspace")
        .to_path_buf();

    chatbot_cmd()
        .current_dir(&workspace_root)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_chat_from_unrelated_directory() {
    let dir = tempdir().unwrap();
    chatbot_cmd()
        .current_dir(dir.path())
        .args(["chat", "--message", "What is the affiliation?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Osmania"));
}
