//! Project Configuration (lpcfmt.toml)
//!
//! Handles project-level configuration stored in `lpcfmt.toml` at the project root.

use crate::{ConfigError, ConfigResult};
use lpcfmt::{FormatOptions, MappingLiteralFormat, SwitchCaseAlignment};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration from lpcfmt.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Formatting configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<FormattingConfig>,
}

/// Formatting configuration section
///
/// Every field is optional; unset fields keep the value from a lower-priority
/// source, falling back to [`FormatOptions::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FormattingConfig {
    /// Spaces per indentation level (default: 4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_size: Option<usize>,

    /// Move trailing `{` of headers onto their own line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub braces_on_new_line: Option<bool>,

    /// Space around `+`, `-`, `==`, `&&`, ... (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_around_binary_operators: Option<bool>,

    /// Space around `=`, `+=`, `-=`, ... (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_around_assignment_operators: Option<bool>,

    /// Maximum run of consecutive blank lines kept in output (default: 2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_blank_lines: Option<usize>,

    /// `case` label alignment: "switch" or "indent" (default: "switch")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_case_alignment: Option<SwitchCaseAlignment>,

    /// Element count above which one-line literals are split (default: 4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_literal_wrap_threshold: Option<usize>,

    /// One-line literal handling: "preserve" or "expanded" (default: "preserve")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_literal_format: Option<MappingLiteralFormat>,
}

impl ProjectConfig {
    /// Load project configuration from a file
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

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(formatting) = &self.formatting {
            formatting.validate()?;
        }
        Ok(())
    }

    /// Merge another project config into this one.
    /// Other config takes precedence for set fields.
    pub fn merge(&mut self, other: &ProjectConfig) {
        match (&mut self.formatting, &other.formatting) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.formatting = Some(theirs.clone()),
            _ => {}
        }
    }
}

impl FormattingConfig {
    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(indent_size) = self.indent_size {
            if !(1..=16).contains(&indent_size) {
                return Err(ConfigError::InvalidValue {
                    field: "formatting.indent_size".to_string(),
                    reason: format!("must be between 1 and 16, got {indent_size}"),
                });
            }
        }
        if let Some(threshold) = self.array_literal_wrap_threshold {
            if threshold == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "formatting.array_literal_wrap_threshold".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge another formatting config into this one.
    /// Other config takes precedence for set fields.
    pub fn merge(&mut self, other: &FormattingConfig) {
        if other.indent_size.is_some() {
            self.indent_size = other.indent_size;
        }
        if other.braces_on_new_line.is_some() {
            self.braces_on_new_line = other.braces_on_new_line;
        }
        if other.space_around_binary_operators.is_some() {
            self.space_around_binary_operators = other.space_around_binary_operators;
        }
        if other.space_around_assignment_operators.is_some() {
            self.space_around_assignment_operators = other.space_around_assignment_operators;
        }
        if other.max_blank_lines.is_some() {
            self.max_blank_lines = other.max_blank_lines;
        }
        if other.switch_case_alignment.is_some() {
            self.switch_case_alignment = other.switch_case_alignment;
        }
        if other.array_literal_wrap_threshold.is_some() {
            self.array_literal_wrap_threshold = other.array_literal_wrap_threshold;
        }
        if other.mapping_literal_format.is_some() {
            self.mapping_literal_format = other.mapping_literal_format;
        }
    }

    /// Apply set fields on top of `options`
    pub fn apply(&self, options: &mut FormatOptions) {
        if let Some(indent_size) = self.indent_size {
            options.indent_size = indent_size;
        }
        if let Some(braces_on_new_line) = self.braces_on_new_line {
            options.braces_on_new_line = braces_on_new_line;
        }
        if let Some(binary) = self.space_around_binary_operators {
            options.space_around_binary_operators = binary;
        }
        if let Some(assignment) = self.space_around_assignment_operators {
            options.space_around_assignment_operators = assignment;
        }
        if let Some(max_blank_lines) = self.max_blank_lines {
            options.max_blank_lines = max_blank_lines;
        }
        if let Some(alignment) = self.switch_case_alignment {
            options.switch_case_alignment = alignment;
        }
        if let Some(threshold) = self.array_literal_wrap_threshold {
            options.array_literal_wrap_threshold = threshold;
        }
        if let Some(format) = self.mapping_literal_format {
            options.mapping_literal_format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_project_config() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_parse_formatting_section() {
        let toml = r#"
[formatting]
indent_size = 2
braces_on_new_line = true
switch_case_alignment = "indent"
mapping_literal_format = "expanded"
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        let formatting = config.formatting.unwrap();
        assert_eq!(formatting.indent_size, Some(2));
        assert_eq!(formatting.braces_on_new_line, Some(true));
        assert_eq!(
            formatting.switch_case_alignment,
            Some(SwitchCaseAlignment::Indent)
        );
        assert_eq!(
            formatting.mapping_literal_format,
            Some(MappingLiteralFormat::Expanded)
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
[formatting]
indnet_size = 2
"#;
        assert!(toml::from_str::<ProjectConfig>(toml).is_err());
    }

    #[test]
    fn test_indent_size_out_of_range() {
        let config = ProjectConfig {
            formatting: Some(FormattingConfig {
                indent_size: Some(0),
                ..Default::default()
            }),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = FormattingConfig {
            indent_size: Some(4),
            max_blank_lines: Some(2),
            ..Default::default()
        };
        let other = FormattingConfig {
            indent_size: Some(2),
            ..Default::default()
        };
        base.merge(&other);
        assert_eq!(base.indent_size, Some(2));
        assert_eq!(base.max_blank_lines, Some(2));
    }

    #[test]
    fn test_apply_overrides_defaults() {
        let formatting = FormattingConfig {
            indent_size: Some(8),
            braces_on_new_line: Some(true),
            ..Default::default()
        };
        let mut options = FormatOptions::default();
        formatting.apply(&mut options);
        assert_eq!(options.indent_size, 8);
        assert!(options.braces_on_new_line);
        assert_eq!(options.max_blank_lines, 2);
    }
}
