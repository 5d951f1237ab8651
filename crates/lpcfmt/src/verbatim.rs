//! Raw text block detection
//!
//! LPC heredoc-style blocks: a line carrying `@LONG`, `@TEXT`, or `@HELP`
//! starts a region that is copied through byte-identical until a line equal
//! to the bare terminator token closes it. Changing these tokens is a
//! breaking change to the recognized language surface.

/// Opener token paired with the terminator that closes its block
const MARKERS: &[(&str, &str)] = &[("@LONG", "LONG"), ("@TEXT", "TEXT"), ("@HELP", "HELP")];

/// Characters that may separate an opener token from the code before it
const SEPARATORS: &[char] = &[' ', '=', ',', '('];

/// If the trimmed line starts a raw block, return the terminator token.
/// A line opens a block when it is exactly a marker, or ends with one
/// directly after a separator character.
pub(crate) fn opening_terminator(trimmed: &str) -> Option<&'static str> {
    for &(marker, terminator) in MARKERS {
        if trimmed == marker {
            return Some(terminator);
        }
        if let Some(prefix) = trimmed.strip_suffix(marker) {
            if prefix.chars().next_back().is_some_and(|c| SEPARATORS.contains(&c)) {
                return Some(terminator);
            }
        }
    }
    None
}

/// Whether the trimmed line closes a block opened with `terminator`.
/// Assignment-fed blocks close with a trailing `;` on the terminator line.
pub(crate) fn is_terminator(trimmed: &str, terminator: &str) -> bool {
    trimmed == terminator || trimmed.strip_suffix(';') == Some(terminator)
}
