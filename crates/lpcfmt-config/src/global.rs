//! Global Configuration (~/.lpcfmt/config.toml)
//!
//! Handles user-level configuration stored in `~/.lpcfmt/config.toml`.

use crate::project::FormattingConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.lpcfmt/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<FormattingConfig>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(formatting) = &self.formatting {
            formatting.validate()?;
        }
        Ok(())
    }

    /// Get the global config file path (~/.lpcfmt/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".lpcfmt").join("config.toml"))
    }

    /// Merge another global config into this one.
    /// Other config takes precedence for set fields.
    pub fn merge(&mut self, other: &GlobalConfig) {
        match (&mut self.formatting, &other.formatting) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.formatting = Some(theirs.clone()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_global_config() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_parse_global_formatting() {
        let toml = r#"
[formatting]
indent_size = 3
max_blank_lines = 1
"#;
        let config: GlobalConfig = toml::from_str(toml).unwrap();
        let formatting = config.formatting.unwrap();
        assert_eq!(formatting.indent_size, Some(3));
        assert_eq!(formatting.max_blank_lines, Some(1));
    }

    #[test]
    fn test_global_validation_rejects_bad_indent() {
        let toml = r#"
[formatting]
indent_size = 40
"#;
        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }
}
