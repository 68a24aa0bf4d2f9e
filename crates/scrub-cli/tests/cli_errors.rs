//! CLI error handling tests for scrub.
//!
//! These tests verify that invalid arguments, rule files and inputs produce
//! appropriate error messages and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the scrub binary.
fn scrub() -> Command {
    let mut cmd = Command::cargo_bin("scrub").expect("scrub binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("SCRUB_LOG")
        .env_remove("SCRUB_RULES")
        .env_remove("SCRUB_LOG_FILE");
    cmd
}

// ============================================================================
// Argument Errors (exit 10)
// ============================================================================

mod arguments {
    use super::*;

    #[test]
    fn unknown_command_fails() {
        scrub()
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn missing_command_fails() {
        scrub().assert().code(10);
    }

    #[test]
    fn unknown_option_fails() {
        scrub()
            .args(["redact", "--invalid-option"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("--invalid-option"));
    }

    #[test]
    fn bad_log_level_fails() {
        scrub()
            .args(["--log-level", "loud", "categories"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unknown log level"));
    }

    #[test]
    fn bad_categories_format_fails() {
        scrub()
            .args(["categories", "--format", "yaml"])
            .assert()
            .code(10);
    }

    #[test]
    fn help_succeeds() {
        scrub()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("redact"))
            .stdout(predicate::str::contains("categories"));
    }

    #[test]
    fn version_succeeds() {
        scrub()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("scrub"));
    }
}

// ============================================================================
// Rule File Errors
// ============================================================================

mod rules {
    use super::*;

    #[test]
    fn invalid_pattern_names_category() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules.toml");
        fs::write(&rules, "[[rules]]\ncategory = \"broken\"\npattern = \"(unclosed\"\n").unwrap();

        scrub()
            .arg("--rules")
            .arg(&rules)
            .arg("categories")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("broken"))
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn duplicate_category_rejected() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules.toml");
        fs::write(&rules, "[[rules]]\ncategory = \"email\"\npattern = \"x\"\n").unwrap();

        scrub()
            .arg("--rules")
            .arg(&rules)
            .arg("categories")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("duplicate category 'email'"));
    }

    #[test]
    fn unsupported_schema_version_rejected() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules.toml");
        fs::write(&rules, "schema_version = \"2.0.0\"\n").unwrap();

        scrub()
            .arg("--rules")
            .arg(&rules)
            .arg("categories")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unsupported rules schema version"));
    }

    #[test]
    fn malformed_toml_rejected() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules.toml");
        fs::write(&rules, "rules = [[[\n").unwrap();

        scrub()
            .arg("--rules")
            .arg(&rules)
            .arg("categories")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("failed to parse"));
    }

    #[test]
    fn missing_rule_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        scrub()
            .arg("--rules")
            .arg(tmp.path().join("absent.toml"))
            .arg("categories")
            .assert()
            .code(21)
            .stderr(predicate::str::contains("absent.toml"));
    }
}

// ============================================================================
// I/O Errors (exit 21)
// ============================================================================

mod io {
    use super::*;

    #[test]
    fn missing_input_file() {
        let tmp = TempDir::new().unwrap();
        scrub()
            .arg("redact")
            .arg(tmp.path().join("nope.log"))
            .assert()
            .code(21)
            .stderr(predicate::str::contains("nope.log"));
    }

    #[test]
    fn unopenable_log_file() {
        let tmp = TempDir::new().unwrap();
        // A directory cannot serve as the log file.
        scrub()
            .arg("--log-file")
            .arg(tmp.path())
            .arg("categories")
            .assert()
            .code(21)
            .stderr(predicate::str::contains("failed to open log file"));
    }
}
