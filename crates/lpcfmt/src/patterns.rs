//! Line-shape recognizers
//!
//! The pattern table: fixed recognizers for the LPC construct shapes the
//! structural pass dispatches on, plus the quote-aware character scanners the
//! recognizers and the pre-scan share. Nothing here parses; every predicate
//! looks at a single trimmed line.

use once_cell::sync::Lazy;
use regex::Regex;

/// `type [type ...] name(` — a function declaration or definition header.
/// The name may carry a glued pointer star: `mixed *parse_args(`.
pub(crate) static FUNCTION_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[\w*]+\s+)+\*?\w+\s*\(").unwrap());

/// `#directive ...`
pub(crate) static PREPROCESSOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s*\w+").unwrap());

/// Splits the directive keyword from its payload for re-spacing
pub(crate) static PREPROCESSOR_SPACING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*(\w+)\s*").unwrap());

/// `inherit ...;`
pub(crate) static INHERIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^inherit\b").unwrap());

/// `:: {` — inheritance block opener
pub(crate) static INHERIT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^::\s*\{$").unwrap());

/// `case <value>` label
pub(crate) static CASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^case\b").unwrap());

/// `default:` label
pub(crate) static DEFAULT_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^default\s*:").unwrap());

/// `return ...`
pub(crate) static RETURN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^return\b").unwrap());

/// Control-flow keywords that introduce a block or a one-statement body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlKind {
    If,
    ElseIf,
    Else,
    For,
    Foreach,
    While,
    Do,
    Switch,
}

/// A control header split into its header text and whatever trails it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ControlHeader {
    pub kind: ControlKind,
    /// The keyword plus its full `( ... )` group, when closed on this line
    pub header: String,
    /// Text after the header: empty, `{`, or an inline statement
    pub rest: String,
}

/// Recognize a control-flow header on a trimmed line and split off anything
/// after its condition. A condition whose `)` is not on this line yields the
/// whole line as header with an empty rest.
pub(crate) fn split_control_header(trimmed: &str) -> Option<ControlHeader> {
    let word_end = trimmed
        .char_indices()
        .find(|&(_, c)| !c.is_alphanumeric() && c != '_')
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let keyword = &trimmed[..word_end];

    match keyword {
        "if" | "for" | "foreach" | "while" | "switch" => {
            let kind = match keyword {
                "if" => ControlKind::If,
                "for" => ControlKind::For,
                "foreach" => ControlKind::Foreach,
                "while" => ControlKind::While,
                _ => ControlKind::Switch,
            };
            Some(split_at_condition(trimmed, word_end, kind))
        }
        "else" => {
            let after = trimmed[word_end..].trim_start();
            if let Some(stripped) = after.strip_prefix("if") {
                if stripped.trim_start().starts_with('(') || stripped.is_empty() {
                    let if_start = trimmed.len() - after.len();
                    return Some(split_at_condition(trimmed, if_start + 2, ControlKind::ElseIf));
                }
            }
            Some(ControlHeader {
                kind: ControlKind::Else,
                header: "else".to_string(),
                rest: after.to_string(),
            })
        }
        "do" => Some(ControlHeader {
            kind: ControlKind::Do,
            header: "do".to_string(),
            rest: trimmed[word_end..].trim_start().to_string(),
        }),
        _ => None,
    }
}

fn split_at_condition(trimmed: &str, search_from: usize, kind: ControlKind) -> ControlHeader {
    let open = trimmed[search_from..]
        .char_indices()
        .find(|&(_, c)| c == '(')
        .map(|(i, _)| search_from + i);
    let close = open.and_then(|o| find_matching_paren(trimmed, o));
    match close {
        Some(close) => {
            let end = close + 1;
            ControlHeader {
                kind,
                header: trimmed[..end].trim_end().to_string(),
                rest: trimmed[end..].trim_start().to_string(),
            }
        }
        // Condition spans lines (or has no parens at all): hand the whole
        // line back as the header and let the caller degrade gracefully.
        None => ControlHeader {
            kind,
            header: trimmed.to_string(),
            rest: String::new(),
        },
    }
}

/// Whether a trimmed line looks like a function header (and not a statement)
pub(crate) fn is_function_header(trimmed: &str) -> bool {
    FUNCTION_HEADER_RE.is_match(trimmed)
        && !trimmed.ends_with(';')
        && split_control_header(trimmed).is_none()
        && !RETURN_RE.is_match(trimmed)
}

/// Find the `)` matching the `(` at byte offset `open`, skipping string and
/// character literal bodies and stopping at a `//` comment.
pub(crate) fn find_matching_paren(line: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut scanner = CodeScanner::default();
    let mut prev = '\0';
    for (i, c) in line.char_indices() {
        let in_code = scanner.step(c, prev);
        prev = c;
        if !in_code || i < open {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        if scanner.at_line_comment {
            break;
        }
    }
    None
}

/// Net `{`/`}` count outside literals and comments. `in_block_comment` is
/// carried across lines by the caller.
pub(crate) fn brace_delta(line: &str, in_block_comment: &mut bool) -> i32 {
    let mut delta = 0i32;
    let mut scanner = CodeScanner {
        in_block_comment: *in_block_comment,
        ..Default::default()
    };
    let mut prev = '\0';
    for c in line.chars() {
        let in_code = scanner.step(c, prev);
        prev = c;
        if scanner.at_line_comment {
            break;
        }
        if !in_code {
            continue;
        }
        match c {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    *in_block_comment = scanner.in_block_comment;
    delta
}

/// Whether the line opens a string literal it does not close
pub(crate) fn has_unterminated_string(line: &str) -> bool {
    let mut scanner = CodeScanner::default();
    let mut prev = '\0';
    for c in line.chars() {
        scanner.step(c, prev);
        prev = c;
        if scanner.at_line_comment {
            break;
        }
    }
    scanner.in_string
}

/// Split on commas at paren/bracket/brace depth zero, respecting literals
pub(crate) fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut scanner = CodeScanner::default();
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        let in_code = scanner.step(c, prev);
        prev = c;
        if !in_code {
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Minimal per-character literal/comment tracker shared by the scanners.
/// `step` returns whether the current character is code (outside any
/// literal or comment).
#[derive(Debug, Default)]
struct CodeScanner {
    in_string: bool,
    in_char: bool,
    escaped: bool,
    in_block_comment: bool,
    at_line_comment: bool,
}

impl CodeScanner {
    fn step(&mut self, c: char, prev: char) -> bool {
        if self.at_line_comment {
            return false;
        }
        if self.in_block_comment {
            if prev == '*' && c == '/' {
                self.in_block_comment = false;
            }
            return false;
        }
        if self.in_string || self.in_char {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if self.in_string && c == '"' {
                self.in_string = false;
            } else if self.in_char && c == '\'' {
                self.in_char = false;
            }
            return false;
        }
        match c {
            '"' => {
                self.in_string = true;
                false
            }
            '\'' => {
                self.in_char = true;
                false
            }
            '/' if prev == '/' => {
                self.at_line_comment = true;
                false
            }
            '*' if prev == '/' => {
                self.in_block_comment = true;
                false
            }
            _ => true,
        }
    }
}
