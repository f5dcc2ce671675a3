//! Text normalization for comparison.
//!
//! Produces the canonical form both sides of every comparison are
//! reduced to before word-overlap scoring. Exact string matching is
//! useless against reformatted or reflowed marketing copy, so
//! everything that is not word content is stripped here.

use crate::patterns;

/// Canonicalize text for comparison.
///
/// Applied steps, in order:
/// 1. strip tag-like markup
/// 2. unify curly quotes to straight quotes
/// 3. remove parenthetical and bracketed asides
/// 4. remove all punctuation except word characters and spaces
/// 5. collapse all whitespace to single spaces
/// 6. lowercase and trim
///
/// Pure and deterministic; always returns a string (empty for empty
/// input). Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let text = patterns::TAG_MARKUP.replace_all(text, " ");
    let text = text
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"");
    let text = patterns::PARENTHETICAL.replace_all(&text, " ");
    let text = patterns::NON_WORD.replace_all(&text, "");
    let text = patterns::WHITESPACE.replace_all(&text, " ");
    text.trim().to_lowercase()
}

/// Collapse whitespace runs to single spaces and trim.
///
/// Lighter-weight form used where the original casing and punctuation
/// must survive (flat page text, paragraph segments).
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    patterns::WHITESPACE.replace_all(text, " ").trim().to_string()
}
