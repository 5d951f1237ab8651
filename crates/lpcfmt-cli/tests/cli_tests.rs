//! Formatter CLI tests
//!
//! Covers stdin filtering, in-place formatting, check mode, directory
//! recursion, and configuration flags.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the lpcfmt command with a clean environment
fn lpcfmt(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lpcfmt").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("LPCFMT_INDENT_SIZE")
        .env_remove("LPCFMT_MAX_BLANK_LINES")
        .env_remove("LPCFMT_BRACES_ON_NEW_LINE");
    cmd
}

// ============================================================================
// Stdin Mode
// ============================================================================

#[test]
fn test_stdin_formats_to_stdout() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .arg("--stdin")
        .write_stdin("x=1;")
        .assert()
        .success()
        .stdout("x = 1;");
}

#[test]
fn test_stdin_check_accepts_formatted() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .args(["--stdin", "--check"])
        .write_stdin("x = 1;")
        .assert()
        .success();
}

#[test]
fn test_stdin_check_rejects_unformatted() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .args(["--stdin", "--check"])
        .write_stdin("x=1;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("would be reformatted"));
}

// ============================================================================
// In-place Formatting
// ============================================================================

#[test]
fn test_format_file_in_place() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("room.c");
    fs::write(&file, "if(x){\ny++;\n}").unwrap();

    lpcfmt(&home)
        .arg(file.to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("Formatted:"));

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "if (x) {\n    y++;\n}"
    );
}

#[test]
fn test_formatted_file_left_alone() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("room.c");
    fs::write(&file, "x = 1;").unwrap();

    lpcfmt(&home)
        .arg(file.to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("Formatted:").not());
}

#[test]
fn test_quiet_suppresses_output() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("room.c");
    fs::write(&file, "x=1;").unwrap();

    lpcfmt(&home)
        .args(["-q", file.to_str().unwrap()])
        .assert()
        .success()
        .stderr("");
}

// ============================================================================
// Check Mode
// ============================================================================

#[test]
fn test_check_mode_passes_formatted_file() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("room.c");
    fs::write(&file, "x = 1;").unwrap();

    lpcfmt(&home)
        .args(["--check", file.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("formatted correctly"));
}

#[test]
fn test_check_mode_fails_on_unformatted_file() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("room.c");
    fs::write(&file, "x=1;").unwrap();

    lpcfmt(&home)
        .args(["--check", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Would reformat"));

    // Check mode never writes
    assert_eq!(fs::read_to_string(&file).unwrap(), "x=1;");
}

// ============================================================================
// Directory Recursion
// ============================================================================

#[test]
fn test_directory_walks_lpc_files_only() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("std")).unwrap();
    fs::write(dir.path().join("std/room.c"), "x=1;").unwrap();
    fs::write(dir.path().join("notes.txt"), "x=1;").unwrap();

    lpcfmt(&home)
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("std/room.c")).unwrap(),
        "x = 1;"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        "x=1;",
        "non-LPC files must not be touched"
    );
}

#[test]
fn test_empty_directory_reports_no_files() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    lpcfmt(&home)
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("No LPC files found"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_indent_size_flag() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .args(["--stdin", "--indent-size", "2"])
        .write_stdin("if(x){\ny++;\n}")
        .assert()
        .success()
        .stdout("if (x) {\n  y++;\n}");
}

#[test]
fn test_config_file_flag() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lpcfmt.toml");
    fs::write(&config, "[formatting]\nindent_size = 2\n").unwrap();

    lpcfmt(&home)
        .args(["--stdin", "-c", config.to_str().unwrap()])
        .write_stdin("if(x){\ny++;\n}")
        .assert()
        .success()
        .stdout("if (x) {\n  y++;\n}");
}

#[test]
fn test_cli_flag_overrides_config_file() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lpcfmt.toml");
    fs::write(&config, "[formatting]\nindent_size = 2\n").unwrap();

    lpcfmt(&home)
        .args([
            "--stdin",
            "-c",
            config.to_str().unwrap(),
            "--indent-size",
            "8",
        ])
        .write_stdin("if(x){\ny++;\n}")
        .assert()
        .success()
        .stdout("if (x) {\n        y++;\n}");
}

#[test]
fn test_invalid_config_is_an_error() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lpcfmt.toml");
    fs::write(&config, "[formatting]\nindent_size = 99\n").unwrap();

    lpcfmt(&home)
        .args(["--stdin", "-c", config.to_str().unwrap()])
        .write_stdin("x = 1;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_out_of_range_indent_size_flag_is_an_error() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .args(["--stdin", "--indent-size", "0"])
        .write_stdin("if(x){\ny++;\n}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid command-line option"));
}

#[test]
fn test_env_override_applies() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .env("LPCFMT_INDENT_SIZE", "2")
        .arg("--stdin")
        .write_stdin("if(x){\ny++;\n}")
        .assert()
        .success()
        .stdout("if (x) {\n  y++;\n}");
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_missing_file_fails() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home)
        .arg("no_such_file.c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_requires_files_or_stdin() {
    let home = TempDir::new().unwrap();
    lpcfmt(&home).assert().failure();
}
