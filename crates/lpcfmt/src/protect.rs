//! Literal span protection
//!
//! The spacing passes must never rewrite the inside of a string literal, a
//! character literal, or a trailing line comment, and must treat
//! multi-character operators as atoms. A [`Vault`] captures those spans into
//! numbered sentinel markers before any rewrite rule runs, and restores them
//! byte-identical afterwards. Operators get their own restore hook so the
//! caller can re-space them.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Opens a captured-span marker. Private-use codepoints cannot appear in any
/// real LPC source the rewrite rules should care about.
pub(crate) const MARK_OPEN: char = '\u{e000}';
/// Closes a captured-span marker.
pub(crate) const MARK_CLOSE: char = '\u{e001}';

static STRING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(?:\\.|[^"\\])*""#).unwrap());
static CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(?:\\.|[^'\\])*'").unwrap());
static LINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*$").unwrap());
static OPERATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\+|--|->|==|!=|<=|>=|\+=|-=|\*=|/=|%=|&&|\|\||::").unwrap());
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{MARK_OPEN}(\d+){MARK_CLOSE}")).unwrap());

/// What a captured span was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanKind {
    /// String literal, delimiters included
    Str,
    /// Character literal, delimiters included
    Char,
    /// Trailing `//` comment
    Comment,
    /// Multi-character operator
    Op,
}

/// Captured spans for one line, in capture order
#[derive(Debug, Default)]
pub(crate) struct Vault {
    spans: Vec<(SpanKind, String)>,
}

impl Vault {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Capture the string, char, and comment spans of a line, in that order.
    /// Comments are captured last so a comment body may itself contain
    /// string markers; restoration resolves the nesting.
    pub(crate) fn capture_literals(&mut self, line: &str) -> String {
        let step = self.capture(SpanKind::Str, &STRING_RE, line);
        let step = self.capture(SpanKind::Char, &CHAR_RE, &step);
        self.capture(SpanKind::Comment, &LINE_COMMENT_RE, &step)
    }

    /// Capture multi-character operators
    pub(crate) fn capture_operators(&mut self, line: &str) -> String {
        self.capture(SpanKind::Op, &OPERATOR_RE, line)
    }

    fn capture(&mut self, kind: SpanKind, pattern: &Regex, text: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let index = self.spans.len();
                self.spans.push((kind, caps[0].to_string()));
                format!("{MARK_OPEN}{index}{MARK_CLOSE}")
            })
            .into_owned()
    }

    /// Restore operator markers only, re-spacing each through `respace`.
    /// Non-operator markers pass through untouched.
    pub(crate) fn restore_operators<F>(&self, text: &str, respace: F) -> String
    where
        F: Fn(&str) -> String,
    {
        MARKER_RE
            .replace_all(text, |caps: &Captures| {
                let index: usize = caps[1].parse().unwrap_or(usize::MAX);
                match self.spans.get(index) {
                    Some((SpanKind::Op, op)) => respace(op),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Restore every remaining marker with its original bytes. Loops because
    /// a restored comment body may reintroduce string markers.
    pub(crate) fn restore(&self, text: &str) -> String {
        let mut current = text.to_string();
        while MARKER_RE.is_match(&current) {
            let next = MARKER_RE
                .replace_all(&current, |caps: &Captures| {
                    let index: usize = caps[1].parse().unwrap_or(usize::MAX);
                    match self.spans.get(index) {
                        Some((_, original)) => original.clone(),
                        // Stray sentinel in the input; drop the marker shape
                        // rather than loop forever.
                        None => caps[1].to_string(),
                    }
                })
                .into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// Run `transform` over a line with strings, chars, and trailing comments
/// shielded, then restore them byte-identical.
pub(crate) fn with_protected<F>(line: &str, transform: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let mut vault = Vault::new();
    let shielded = vault.capture_literals(line);
    vault.restore(&transform(&shielded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_round_trip() {
        let mut vault = Vault::new();
        let shielded = vault.capture_literals(r#"x = "a  +  b";"#);
        assert!(!shielded.contains("a  +  b"));
        assert_eq!(vault.restore(&shielded), r#"x = "a  +  b";"#);
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        let mut vault = Vault::new();
        let line = r#"say("he said \"hi\"" + x);"#;
        let shielded = vault.capture_literals(line);
        assert!(!shielded.contains("hi"));
        assert_eq!(vault.restore(&shielded), line);
    }

    #[test]
    fn test_comment_containing_string_restores() {
        let mut vault = Vault::new();
        let line = r#"x = 1; // set "name" later"#;
        let shielded = vault.capture_literals(line);
        assert_eq!(vault.restore(&shielded), line);
    }

    #[test]
    fn test_char_literal_round_trip() {
        let mut vault = Vault::new();
        let line = "if (c == ' ') n++;";
        let step = vault.capture_literals(line);
        let step = vault.capture_operators(&step);
        let restored = vault.restore(&vault.restore_operators(&step, |op| op.to_string()));
        assert_eq!(restored, line);
    }

    #[test]
    fn test_operator_respacing() {
        let mut vault = Vault::new();
        let shielded = vault.capture_operators("a==b");
        let spaced = vault.restore_operators(&shielded, |op| format!(" {op} "));
        assert_eq!(spaced, "a == b");
    }

    #[test]
    fn test_increment_is_an_atom() {
        let mut vault = Vault::new();
        let shielded = vault.capture_operators("y++;");
        assert!(!shielded.contains('+'));
        assert_eq!(vault.restore(&shielded), "y++;");
    }

    #[test]
    fn test_with_protected_shields_transform() {
        let out = with_protected(r#"x = "a,b";"#, |text| text.replace(',', ", "));
        assert_eq!(out, r#"x = "a,b";"#);
    }

    #[test]
    fn test_operators_inside_strings_untouched() {
        let mut vault = Vault::new();
        let line = r#"msg = "1+1==2";"#;
        let step = vault.capture_literals(line);
        let step = vault.capture_operators(&step);
        let restored = vault.restore(&vault.restore_operators(&step, |op| format!(" {op} ")));
        assert_eq!(restored, line);
    }
}
