//! LPC-specific touch-ups
//!
//! A second ordered rewrite pass applied after the generic spacing rules.
//! Later rules assume earlier ones already removed incidental whitespace.
//! Runs on protected text: string bodies are atoms here, which is what lets
//! the concatenation rules key on the protection sentinels instead of quote
//! characters.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::line::RewriteRule;
use crate::protect::{with_protected, MARK_CLOSE, MARK_OPEN};

/// Type keywords that make a parenthesized word a cast
const CAST_TYPES: &str = "int|float|string|object|mapping|mixed|function|buffer|array|void|status";

/// Keywords that keep a space before their parenthesis
const CALL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "foreach", "while", "switch", "do", "case", "return", "catch",
];

const NORMALIZER_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "keyword_call_spacing",
        apply: keyword_call_spacing,
    },
    RewriteRule {
        name: "cast_spacing",
        apply: cast_spacing,
    },
    RewriteRule {
        name: "call_site_spacing",
        apply: call_site_spacing,
    },
    RewriteRule {
        name: "subscript_spacing",
        apply: subscript_spacing,
    },
    RewriteRule {
        name: "varargs_spacing",
        apply: varargs_spacing,
    },
    RewriteRule {
        name: "scope_spacing",
        apply: scope_spacing,
    },
    RewriteRule {
        name: "concat_spacing",
        apply: concat_spacing,
    },
    RewriteRule {
        name: "mapping_pair_spacing",
        apply: mapping_pair_spacing,
    },
];

/// Apply the LPC-specific rules to one line, shielding literal content
pub(crate) fn normalize(line: &str) -> String {
    with_protected(line, |text| {
        let mut current = text.to_string();
        for rule in NORMALIZER_RULES {
            current = rule.apply_until_stable(&current);
        }
        current
    })
}

static KEYWORD_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(if|for|foreach|while|switch|catch)\(").unwrap());

fn keyword_call_spacing(text: &str) -> String {
    KEYWORD_CALL_RE.replace_all(text, "${1} (").into_owned()
}

static CAST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\(\s*({CAST_TYPES})\s*(\*?)\s*\)\s*([\w(])")).unwrap()
});

fn cast_spacing(text: &str) -> String {
    CAST_RE.replace_all(text, "(${1}${2})${3}").into_owned()
}

static CALL_SITE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(\s*").unwrap());
static CLOSE_PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\)").unwrap());

fn call_site_spacing(text: &str) -> String {
    let step = CALL_SITE_RE.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        if CALL_KEYWORDS.contains(&name) {
            format!("{name} (")
        } else {
            format!("{name}(")
        }
    });
    CLOSE_PAREN_RE.replace_all(&step, ")").into_owned()
}

static SUBSCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)\s*\[\s*").unwrap());
static SUBSCRIPT_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\]").unwrap());

fn subscript_spacing(text: &str) -> String {
    let step = SUBSCRIPT_RE.replace_all(text, "${1}[");
    SUBSCRIPT_CLOSE_RE.replace_all(&step, "]").into_owned()
}

static VARARGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\.\.\.\s*").unwrap());

fn varargs_spacing(text: &str) -> String {
    VARARGS_RE.replace_all(text, "...").into_owned()
}

static SCOPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)\s*::\s*(\w)").unwrap());

fn scope_spacing(text: &str) -> String {
    SCOPE_RE.replace_all(text, "${1}::${2}").into_owned()
}

static CONCAT_LEFT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"([^\s+])\s*\+\s*({MARK_OPEN})")).unwrap());
static CONCAT_RIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({MARK_CLOSE})\s*\+\s*([^\s+])")).unwrap());

fn concat_spacing(text: &str) -> String {
    let step = CONCAT_LEFT_RE.replace_all(text, "${1} + ${2}");
    CONCAT_RIGHT_RE.replace_all(&step, "${1} + ${2}").into_owned()
}

static MAPPING_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s+\[").unwrap());
static MAPPING_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]\s+\)").unwrap());

fn mapping_pair_spacing(text: &str) -> String {
    let step = MAPPING_OPEN_RE.replace_all(text, "([");
    MAPPING_CLOSE_RE.replace_all(&step, "])").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("if(x)", "if (x)")]
    #[case("while(1)", "while (1)")]
    #[case("foreach(item in list)", "foreach (item in list)")]
    #[case("( int )level", "(int)level")]
    #[case("(string *) args", "(string*)args")]
    #[case("write ( msg )", "write(msg)")]
    #[case("arr [ 2 ]", "arr[2]")]
    #[case("mixed args ...", "mixed args...")]
    #[case("room :: create()", "room::create()")]
    #[case("( [", "([")]
    #[case("] )", "])")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected, "{input}");
    }

    #[test]
    fn test_keyword_keeps_space_before_paren() {
        assert_eq!(normalize("} while (x);"), "} while (x);");
        assert_eq!(normalize("return (x);"), "return (x);");
    }

    #[test]
    fn test_call_tightening_skips_string_bodies() {
        assert_eq!(
            normalize(r#"say("use write ( msg )");"#),
            r#"say("use write ( msg )");"#
        );
    }

    #[test]
    fn test_concat_spacing_around_strings() {
        assert_eq!(normalize(r#"msg = "a"+name+"b";"#), r#"msg = "a" + name + "b";"#);
        assert_eq!(normalize(r#"msg = "a"+"b";"#), r#"msg = "a" + "b";"#);
    }

    #[test]
    fn test_cast_ignores_non_type_words() {
        assert_eq!(normalize("(result) trailing"), "(result) trailing");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(r#"if(objs [ 0 ]->query ( "id" )+1)"#);
        assert_eq!(normalize(&once), once);
    }
}
