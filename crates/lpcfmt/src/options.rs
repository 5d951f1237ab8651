//! Formatter configuration

use serde::{Deserialize, Serialize};

/// Formatter configuration for one run
///
/// Constructed once at the boundary and passed by reference into the pure
/// `format` entry points; the core never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indentation level (default: 4)
    pub indent_size: usize,
    /// Put the opening brace of a block on its own line (default: false)
    pub braces_on_new_line: bool,
    /// Surround binary/comparison/logical operators with spaces (default: true)
    pub space_around_binary_operators: bool,
    /// Surround `=` and compound assignment operators with spaces (default: true)
    pub space_around_assignment_operators: bool,
    /// Maximum number of consecutive blank lines to keep (default: 2)
    pub max_blank_lines: usize,
    /// Where `case`/`default` labels sit relative to their `switch`
    pub switch_case_alignment: SwitchCaseAlignment,
    /// Element count above which a one-line collection literal is re-wrapped
    /// (only under [`MappingLiteralFormat::Expanded`], default: 4)
    pub array_literal_wrap_threshold: usize,
    /// Whether one-line collection literals may be expanded (default: preserve)
    pub mapping_literal_format: MappingLiteralFormat,
}

/// `case`/`default` label placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchCaseAlignment {
    /// Labels flush with the enclosing `switch`
    Switch,
    /// Labels one level deeper than the `switch`
    Indent,
}

/// Collection literal wrapping behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingLiteralFormat {
    /// Keep one-line literals on one line
    Preserve,
    /// Expand one-line literals above the wrap threshold to one element per line
    Expanded,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            braces_on_new_line: false,
            space_around_binary_operators: true,
            space_around_assignment_operators: true,
            max_blank_lines: 2,
            switch_case_alignment: SwitchCaseAlignment::Switch,
            array_literal_wrap_threshold: 4,
            mapping_literal_format: MappingLiteralFormat::Preserve,
        }
    }
}

impl FormatOptions {
    /// Create options with a custom indent size
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Create options with a brace placement style
    pub fn with_braces_on_new_line(mut self, enabled: bool) -> Self {
        self.braces_on_new_line = enabled;
        self
    }

    /// Create options with a blank-line cap
    pub fn with_max_blank_lines(mut self, max: usize) -> Self {
        self.max_blank_lines = max;
        self
    }

    /// Create options with a `case` alignment mode
    pub fn with_switch_case_alignment(mut self, alignment: SwitchCaseAlignment) -> Self {
        self.switch_case_alignment = alignment;
        self
    }

    /// Create options with a collection literal format
    pub fn with_mapping_literal_format(mut self, format: MappingLiteralFormat) -> Self {
        self.mapping_literal_format = format;
        self
    }

    /// Create options with a collection wrap threshold
    pub fn with_array_literal_wrap_threshold(mut self, threshold: usize) -> Self {
        self.array_literal_wrap_threshold = threshold;
        self
    }

    /// The indent string for one nesting level
    pub(crate) fn indent_unit(&self) -> String {
        " ".repeat(self.indent_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = FormatOptions::default();
        assert_eq!(opts.indent_size, 4);
        assert!(!opts.braces_on_new_line);
        assert_eq!(opts.max_blank_lines, 2);
        assert_eq!(opts.switch_case_alignment, SwitchCaseAlignment::Switch);
        assert_eq!(opts.mapping_literal_format, MappingLiteralFormat::Preserve);
    }

    #[test]
    fn test_builder_chain() {
        let opts = FormatOptions::default()
            .with_indent_size(2)
            .with_braces_on_new_line(true)
            .with_max_blank_lines(1);
        assert_eq!(opts.indent_size, 2);
        assert!(opts.braces_on_new_line);
        assert_eq!(opts.max_blank_lines, 1);
    }

    #[test]
    fn test_indent_unit() {
        let opts = FormatOptions::default().with_indent_size(2);
        assert_eq!(opts.indent_unit(), "  ");
    }
}
