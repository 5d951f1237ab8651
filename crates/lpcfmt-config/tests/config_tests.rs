//! Configuration loading tests

use lpcfmt_config::{ConfigLoader, ProjectConfig};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("lpcfmt.toml"), content).unwrap();
}

#[test]
fn test_load_project_config_from_file() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"
[formatting]
indent_size = 2
max_blank_lines = 1
"#,
    );
    let config = ProjectConfig::load_from_file(&dir.path().join("lpcfmt.toml")).unwrap();
    let formatting = config.formatting.unwrap();
    assert_eq!(formatting.indent_size, Some(2));
    assert_eq!(formatting.max_blank_lines, Some(1));
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = ProjectConfig::load_from_file(&dir.path().join("lpcfmt.toml"));
    assert!(matches!(
        result,
        Err(lpcfmt_config::ConfigError::NotFound(_))
    ));
}

#[test]
fn test_invalid_toml_reports_file() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[formatting\nindent_size = 2");
    let result = ProjectConfig::load_from_file(&dir.path().join("lpcfmt.toml"));
    assert!(matches!(
        result,
        Err(lpcfmt_config::ConfigError::TomlParseError { .. })
    ));
}

#[test]
fn test_out_of_range_indent_rejected_at_load() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[formatting]\nindent_size = 32\n");
    let result = ProjectConfig::load_from_file(&dir.path().join("lpcfmt.toml"));
    assert!(matches!(
        result,
        Err(lpcfmt_config::ConfigError::InvalidValue { .. })
    ));
}

#[test]
#[serial]
fn test_loader_walks_up_to_project_root() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[formatting]\nindent_size = 2\n");
    let nested = dir.path().join("lib").join("std");
    fs::create_dir_all(&nested).unwrap();

    let mut loader = ConfigLoader::new();
    let config = loader.load_from_directory(&nested).unwrap();
    assert_eq!(
        config.project_root.as_deref(),
        Some(dir.path()),
        "project root should be where lpcfmt.toml lives"
    );
    assert_eq!(config.format_options().unwrap().indent_size, 2);
}

#[test]
#[serial]
fn test_env_override_beats_project_config() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[formatting]\nindent_size = 2\n");

    std::env::set_var("LPCFMT_INDENT_SIZE", "8");
    let mut loader = ConfigLoader::new();
    let config = loader.load_from_directory(dir.path()).unwrap();
    std::env::remove_var("LPCFMT_INDENT_SIZE");

    assert_eq!(config.format_options().unwrap().indent_size, 8);
}

#[test]
#[serial]
fn test_invalid_env_value_is_an_error() {
    let dir = TempDir::new().unwrap();

    std::env::set_var("LPCFMT_INDENT_SIZE", "lots");
    let mut loader = ConfigLoader::new();
    let result = loader.load_from_directory(dir.path());
    std::env::remove_var("LPCFMT_INDENT_SIZE");

    assert!(matches!(
        result,
        Err(lpcfmt_config::ConfigError::InvalidEnvValue { .. })
    ));
}
