//! Line-heuristic source formatter for LPC.
//!
//! Formats LPC code one line at a time: a structural pass tracks block,
//! literal, and comment nesting to assign indentation, while per-line
//! rewrite rules normalize operator and punctuation spacing without ever
//! touching the contents of string, character, or comment literals.
//!
//! Formatting is total. Malformed or partial input is never an error;
//! unrecognized lines pass through with whitespace normalization only and
//! structural confusion degrades to pass-through rather than garbled
//! output.
//!
//! ```
//! use lpcfmt::format_source;
//!
//! let out = format_source("void create() {\nif(x) y++;\n}");
//! assert_eq!(out, "void create() {\n    if (x)\n        y++;\n}");
//! ```

mod context;
mod engine;
mod line;
mod options;
mod patterns;
mod protect;
mod syntax;
mod verbatim;

pub use options::{FormatOptions, MappingLiteralFormat, SwitchCaseAlignment};

/// Format LPC source text with default options.
pub fn format_source(source: &str) -> String {
    format_source_with_options(source, &FormatOptions::default())
}

/// Format LPC source text with explicit options.
///
/// The result is always valid UTF-8 text with lines joined by `\n`; no
/// trailing newline is appended beyond what line joining produces.
pub fn format_source_with_options(source: &str, options: &FormatOptions) -> String {
    engine::Engine::new(options).format(source)
}

/// Whether `source` is already formatted under default options.
pub fn check_formatted(source: &str) -> bool {
    check_formatted_with_options(source, &FormatOptions::default())
}

/// Whether `source` is already formatted under `options`.
pub fn check_formatted_with_options(source: &str, options: &FormatOptions) -> bool {
    format_source_with_options(source, options) == source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(format_source(""), "");
    }

    #[test]
    fn check_detects_unformatted_input() {
        assert!(check_formatted("int x = 1;"));
        assert!(!check_formatted("int x=1;"));
    }
}
