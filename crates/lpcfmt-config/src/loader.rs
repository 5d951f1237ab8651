//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{FormattingConfig, ProjectConfig};
use crate::{ConfigError, ConfigResult};
use lpcfmt::{FormatOptions, MappingLiteralFormat, SwitchCaseAlignment};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.lpcfmt/config.toml) - lowest priority
/// 2. Project config (./lpcfmt.toml) - overrides global
/// 3. Environment variables (LPCFMT_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Environment variable overrides
    pub env: FormattingConfig,

    /// Project root directory (where lpcfmt.toml was found)
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Resolve the effective formatter options from all sources
    pub fn format_options(&self) -> ConfigResult<FormatOptions> {
        let mut options = FormatOptions::default();
        if let Some(formatting) = &self.global.formatting {
            formatting.apply(&mut options);
        }
        if let Some(formatting) = &self.project.formatting {
            formatting.apply(&mut options);
        }
        self.env.validate()?;
        self.env.apply(&mut options);
        Ok(options)
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find lpcfmt.toml, then loads and merges
    /// global config if it exists. A missing project config is not an error;
    /// defaults apply.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let global = self.load_global_config()?;
        let env = env_overrides()?;

        Ok(Config {
            project,
            global,
            env,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let global = self.load_global_config()?;
        let env = env_overrides()?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            project,
            global,
            env,
            project_root,
        })
    }

    /// Find project configuration by walking up the directory tree
    ///
    /// Returns (project_root, project_config), or defaults with no root when
    /// no lpcfmt.toml exists on the path to the filesystem root.
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join("lpcfmt.toml");
            if config_path.exists() {
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project));
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration from ~/.lpcfmt/config.toml
    ///
    /// A missing file (or missing home directory) yields defaults.
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        if self.global_config_path.is_none() {
            match GlobalConfig::global_config_path() {
                Ok(path) => self.global_config_path = Some(path),
                Err(ConfigError::HomeNotFound) => return Ok(GlobalConfig::default()),
                Err(e) => return Err(e),
            }
        }
        match &self.global_config_path {
            Some(path) if path.exists() => GlobalConfig::load_from_file(path),
            _ => Ok(GlobalConfig::default()),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read LPCFMT_* environment variable overrides
///
/// Recognized variables: LPCFMT_INDENT_SIZE, LPCFMT_MAX_BLANK_LINES,
/// LPCFMT_BRACES_ON_NEW_LINE, LPCFMT_SWITCH_CASE_ALIGNMENT,
/// LPCFMT_MAPPING_LITERAL_FORMAT.
fn env_overrides() -> ConfigResult<FormattingConfig> {
    let mut overrides = FormattingConfig::default();

    if let Some(value) = env_var("LPCFMT_INDENT_SIZE") {
        overrides.indent_size = Some(parse_usize("LPCFMT_INDENT_SIZE", &value)?);
    }
    if let Some(value) = env_var("LPCFMT_MAX_BLANK_LINES") {
        overrides.max_blank_lines = Some(parse_usize("LPCFMT_MAX_BLANK_LINES", &value)?);
    }
    if let Some(value) = env_var("LPCFMT_BRACES_ON_NEW_LINE") {
        overrides.braces_on_new_line = Some(parse_bool(&value));
    }
    if let Some(value) = env_var("LPCFMT_SWITCH_CASE_ALIGNMENT") {
        overrides.switch_case_alignment = Some(match value.to_lowercase().as_str() {
            "switch" => SwitchCaseAlignment::Switch,
            "indent" => SwitchCaseAlignment::Indent,
            other => {
                return Err(ConfigError::InvalidEnvValue {
                    var: "LPCFMT_SWITCH_CASE_ALIGNMENT".to_string(),
                    reason: format!("expected 'switch' or 'indent', got '{other}'"),
                })
            }
        });
    }
    if let Some(value) = env_var("LPCFMT_MAPPING_LITERAL_FORMAT") {
        overrides.mapping_literal_format = Some(match value.to_lowercase().as_str() {
            "preserve" => MappingLiteralFormat::Preserve,
            "expanded" => MappingLiteralFormat::Expanded,
            other => {
                return Err(ConfigError::InvalidEnvValue {
                    var: "LPCFMT_MAPPING_LITERAL_FORMAT".to_string(),
                    reason: format!("expected 'preserve' or 'expanded', got '{other}'"),
                })
            }
        });
    }

    Ok(overrides)
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_usize(var: &str, value: &str) -> ConfigResult<usize> {
    value.parse().map_err(|_| ConfigError::InvalidEnvValue {
        var: var.to_string(),
        reason: format!("expected a non-negative integer, got '{value}'"),
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
