//! Generic line spacing
//!
//! Normalizes spacing on one logical line. String literals, character
//! literals, trailing comments, and multi-character operators are captured
//! into a [`Vault`](crate::protect::Vault) first, so the rewrite rules only
//! ever see plain code text. Rules run in a fixed order; each iterates to a
//! bounded fixpoint so chains like `a+b+c` space fully in one call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::FormatOptions;
use crate::protect::Vault;

/// One named, independently testable rewrite
pub(crate) struct RewriteRule {
    pub(crate) name: &'static str,
    pub(crate) apply: fn(&str) -> String,
}

impl RewriteRule {
    /// Apply until the text stops changing. Four passes cover the deepest
    /// operator chains a line realistically holds.
    pub(crate) fn apply_until_stable(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..4 {
            let next = (self.apply)(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// Spacing rules applied to protected text, in order
const SPACING_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "arithmetic_spacing",
        apply: arithmetic_spacing,
    },
    RewriteRule {
        name: "relational_spacing",
        apply: relational_spacing,
    },
    RewriteRule {
        name: "assignment_spacing",
        apply: assignment_spacing,
    },
    RewriteRule {
        name: "colon_spacing",
        apply: colon_spacing,
    },
];

/// Punctuation cleanup applied after operators are restored, in order
const CLEANUP_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "comma_spacing",
        apply: comma_spacing,
    },
    RewriteRule {
        name: "semicolon_spacing",
        apply: semicolon_spacing,
    },
    RewriteRule {
        name: "paren_interior",
        apply: paren_interior,
    },
    RewriteRule {
        name: "bracket_interior",
        apply: bracket_interior,
    },
    RewriteRule {
        name: "brace_interior",
        apply: brace_interior,
    },
    RewriteRule {
        name: "whitespace_collapse",
        apply: whitespace_collapse,
    },
];

/// Normalize spacing on one trimmed line, shielding literal content
pub(crate) fn format_line(line: &str, opts: &FormatOptions) -> String {
    let mut vault = Vault::new();
    let text = vault.capture_literals(line.trim());
    let mut text = vault.capture_operators(&text);

    for rule in SPACING_RULES {
        if rule_enabled(rule.name, opts) {
            text = rule.apply_until_stable(&text);
        }
    }

    text = vault.restore_operators(&text, |op| respace_operator(op, opts));

    for rule in CLEANUP_RULES {
        text = rule.apply_until_stable(&text);
    }

    vault.restore(&text).trim().to_string()
}

fn rule_enabled(name: &str, opts: &FormatOptions) -> bool {
    match name {
        "arithmetic_spacing" | "relational_spacing" => opts.space_around_binary_operators,
        "assignment_spacing" => opts.space_around_assignment_operators,
        _ => true,
    }
}

/// How a restored compound operator is spaced
fn respace_operator(op: &str, opts: &FormatOptions) -> String {
    match op {
        // Increment/decrement bind to their operand
        "++" | "--" => op.to_string(),
        "->" | "::" => format!(" {op} "),
        "==" | "!=" | "<=" | ">=" | "&&" | "||" => {
            if opts.space_around_binary_operators {
                format!(" {op} ")
            } else {
                op.to_string()
            }
        }
        _ => {
            if opts.space_around_assignment_operators {
                format!(" {op} ")
            } else {
                op.to_string()
            }
        }
    }
}

/// Characters that mark the preceding context as unary: an operator found
/// right after one of these has no left operand.
const UNARY_PREFIX: &[char] = &[
    '+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|', ',', '(', '[', '{',
];

/// Single-character arithmetic operators get one space on each side. A
/// character scan rather than a regex: a chain like `a+b+c` needs every
/// operator's right operand to stay available as the next operator's left
/// operand, which regex replacement consumes.
fn arithmetic_spacing(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '+' | '-' | '*' | '/' | '%') {
            // `type *name` keeps the pointer star glued to the name
            let pointer_star = c == '*'
                && i > 0
                && chars[i - 1] == ' '
                && chars
                    .get(i + 1)
                    .is_some_and(|n| n.is_alphanumeric() || *n == '_');
            let left = out.trim_end().chars().last();
            let right = chars[i + 1..].iter().find(|ch| **ch != ' ').copied();
            let binary = !pointer_star
                && left.is_some_and(|p| !UNARY_PREFIX.contains(&p))
                && right.is_some_and(|n| !matches!(n, '=' | '+' | '-' | '*' | '/' | '%'));
            if binary {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push(' ');
                out.push(c);
                out.push(' ');
                i += 1;
                while i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

static RELATIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^<>=!\s])\s*([<>])\s*([^<>= ])").unwrap());

fn relational_spacing(text: &str) -> String {
    RELATIONAL_RE
        .replace_all(text, "${1} ${2} ${3}")
        .into_owned()
}

static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^+\-*/%=<>!&| ])\s*=\s*").unwrap());

fn assignment_spacing(text: &str) -> String {
    ASSIGNMENT_RE.replace_all(text, "${1} = ").into_owned()
}

static COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S)\s*:\s*(\S)").unwrap());

fn colon_spacing(text: &str) -> String {
    COLON_RE.replace_all(text, "${1} : ${2}").into_owned()
}

static COMMA_BEFORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").unwrap());
static COMMA_AFTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*(\S)").unwrap());

fn comma_spacing(text: &str) -> String {
    let step = COMMA_BEFORE_RE.replace_all(text, ",");
    COMMA_AFTER_RE.replace_all(&step, ", ${1}").into_owned()
}

static SEMICOLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+;").unwrap());

fn semicolon_spacing(text: &str) -> String {
    SEMICOLON_RE.replace_all(text, ";").into_owned()
}

static PAREN_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s+").unwrap());
static PAREN_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\)").unwrap());

fn paren_interior(text: &str) -> String {
    let step = PAREN_OPEN_RE.replace_all(text, "(");
    PAREN_CLOSE_RE.replace_all(&step, ")").into_owned()
}

static BRACKET_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s+").unwrap());
static BRACKET_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\]").unwrap());

fn bracket_interior(text: &str) -> String {
    let step = BRACKET_OPEN_RE.replace_all(text, "[");
    BRACKET_CLOSE_RE.replace_all(&step, "]").into_owned()
}

static BRACE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[ \t]*").unwrap());
static BRACE_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\}").unwrap());

fn brace_interior(text: &str) -> String {
    // A brace alone on its line has nothing to normalize. Brace interiors
    // keep one space: `({ 1, 2 })`, `if (x) { y(); }`.
    if text.trim() == "{" || text.trim() == "}" {
        return text.to_string();
    }
    let step = BRACE_OPEN_RE.replace_all(text, "{ ");
    BRACE_CLOSE_RE.replace_all(&step, " }").into_owned()
}

static COLLAPSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}|\t").unwrap());

fn whitespace_collapse(text: &str) -> String {
    COLLAPSE_RE.replace_all(text, " ").into_owned()
}
