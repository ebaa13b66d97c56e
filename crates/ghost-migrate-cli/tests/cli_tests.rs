//! CLI integration tests for ghost-migrate.
//!
//! These tests verify command-line argument parsing, help output,
//! derived names and exit codes for error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the ghost-migrate binary.
fn cmd() -> Command {
    Command::cargo_bin("ghost-migrate").unwrap()
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("names"))
        .stdout(predicate::str::contains("check-config"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghost-migrate"));
}

#[test]
fn test_trigger_suffix_default() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--trigger-suffix"))
        .stdout(predicate::str::contains("[default: _gho]"));
}

#[test]
fn test_log_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Names
// =============================================================================

#[test]
fn test_names_for_table() {
    cmd()
        .args(["--table", "some_table", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_some_table_gho"))
        .stdout(predicate::str::contains("_some_table_ghc"))
        .stdout(predicate::str::contains("_some_table_del"));
}

#[test]
fn test_names_with_forced_base() {
    cmd()
        .args(["--table", "foo_bar_baz", "--force-table-names", "tmp", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_tmp_gho"))
        .stdout(predicate::str::contains("foo_bar_baz").not());
}

#[test]
fn test_names_with_triggers() {
    cmd()
        .args([
            "--table",
            "t",
            "--remove-trigger-suffix-if-exists",
            "names",
            "--trigger",
            "my_trigger_gho",
            "--trigger",
            "audit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("my_trigger_gho -> my_trigger"))
        .stdout(predicate::str::contains("audit -> audit_gho"));
}

#[test]
fn test_names_json_output() {
    cmd()
        .args(["--table", "orders", "--output-json", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ghost\": \"_orders_gho\""));
}

#[test]
fn test_trigger_too_long_exits_with_code_3() {
    let long_trigger = "x".repeat(61);
    cmd()
        .args(["--table", "t", "--trigger-suffix", "_ght", "names", "--trigger"])
        .arg(&long_trigger)
        .assert()
        .code(3);
}

#[test]
fn test_missing_table_exits_with_code_2() {
    cmd()
        .arg("names")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("table name is required"));
}

// =============================================================================
// Config file
// =============================================================================

#[test]
fn test_check_config_missing_file_exits_with_code_2() {
    cmd()
        .args(["--conf", "/does/not/exist", "check-config"])
        .assert()
        .code(2);
}

#[test]
fn test_check_config_requires_conf() {
    cmd().arg("check-config").assert().code(2);
}

#[test]
fn test_check_config_redacts_password() {
    let file = config_file("[client]\nuser=test\npassword=123456\n[osc]\nchunk_size=500\n");
    cmd()
        .args(["--conf", file.path().to_str().unwrap(), "check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user: test"))
        .stdout(predicate::str::contains("chunk_size: 500"))
        .stdout(predicate::str::contains("123456").not());
}

#[test]
fn test_check_config_keeps_tunables_verbatim() {
    let file = config_file("[osc]\nmax_load=10\n");
    cmd()
        .args(["--conf", file.path().to_str().unwrap(), "check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_load: 10"));
}

#[test]
fn test_names_with_unparsed_max_load() {
    let file = config_file("[osc]\nmax_load=10\n");
    cmd()
        .args(["--conf", file.path().to_str().unwrap(), "--table", "t", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_t_gho"));
}

#[test]
fn test_names_uses_config_file() {
    let file = config_file("[client]\nuser=test\n");
    cmd()
        .args([
            "--conf",
            file.path().to_str().unwrap(),
            "--table",
            "t",
            "names",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("_t_gho"));
}
