//! Compiled regex patterns used across the comparison pipeline.
//!
//! All patterns are compiled once at startup using `LazyLock`.
//! Patterns are organized by the pipeline stage that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Text Normalization Patterns
// =============================================================================

/// Matches tag-like markup remnants (`<b>`, `</p>`, `<br/>`).
pub static TAG_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_MARKUP regex"));

/// Matches parenthetical and bracketed asides, including the delimiters.
pub static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("PARENTHETICAL regex"));

/// Matches everything that is neither a word character nor whitespace.
pub static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("NON_WORD regex"));

/// Matches runs of whitespace (spaces, tabs, newlines) for collapsing.
pub static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE regex"));

// =============================================================================
// Script / Meta Redirect Detection Patterns
// =============================================================================
// Best-effort pattern matching over the response body, not a script
// interpreter. Priority order is fixed: the first pattern type that
// matches wins, even if a later pattern names a different target.

/// Matches a `redirecturl` script variable assignment.
pub static REDIRECT_URL_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)redirecturl\s*=\s*["']([^"']+)["']"#).expect("REDIRECT_URL_VAR regex")
});

/// Matches `window.location = ...` and `window.location.href = ...`.
pub static WINDOW_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)window\.location(?:\.href)?\s*=\s*["']([^"']+)["']"#)
        .expect("WINDOW_LOCATION regex")
});

/// Matches `window.location.replace('...')` calls.
pub static LOCATION_REPLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)window\.location\.replace\(\s*["']([^"']+)["']\s*\)"#)
        .expect("LOCATION_REPLACE regex")
});

/// Matches `<meta http-equiv="refresh" content="0; url=...">` tags.
pub static META_REFRESH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*http-equiv\s*=\s*["']?refresh["']?[^>]*url\s*=\s*["']?([^"'>\s;]+)"#)
        .expect("META_REFRESH regex")
});

// =============================================================================
// Reference Document Patterns
// =============================================================================

/// Matches bare URLs in raw document text.
pub static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("BARE_URL regex")
});

/// Matches blank-line block boundaries (one or more empty lines).
pub static BLOCK_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("BLOCK_BOUNDARY regex"));

// =============================================================================
// Image Classification Patterns
// =============================================================================

/// Matches src values of known tracking pixels and layout spacers.
pub static DECORATIVE_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(track(?:ing)?|pixel|spacer|beacon|blank|clear|transparent|1x1|shim)")
        .expect("DECORATIVE_SRC regex")
});

/// Matches alt text that is a generic placeholder rather than a description.
pub static GENERIC_ALT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(image|img|photo|picture|graphic|icon|logo|banner|untitled|screenshot|dsc)[\s\d_-]*$")
        .expect("GENERIC_ALT regex")
});

// =============================================================================
// Responsiveness Patterns
// =============================================================================

/// Matches CSS media queries in inline styles or style blocks.
pub static MEDIA_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@media[^{]*\{").expect("MEDIA_QUERY regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_location_matches_both_forms() {
        let caps = WINDOW_LOCATION
            .captures("window.location.href='https://x/y';")
            .unwrap();
        assert_eq!(&caps[1], "https://x/y");

        let caps = WINDOW_LOCATION
            .captures(r#"window.location = "https://a/b""#)
            .unwrap();
        assert_eq!(&caps[1], "https://a/b");
    }

    #[test]
    fn meta_refresh_extracts_url() {
        let html = r#"<meta http-equiv="refresh" content="5; url=https://example.com/next">"#;
        let caps = META_REFRESH.captures(html).unwrap();
        assert_eq!(&caps[1], "https://example.com/next");
    }

    #[test]
    fn meta_refresh_handles_unquoted_attributes() {
        let html = "<meta http-equiv=refresh content=0;url=/landing>";
        let caps = META_REFRESH.captures(html).unwrap();
        assert_eq!(&caps[1], "/landing");
    }

    #[test]
    fn decorative_src_matches_tracking_pixel() {
        assert!(DECORATIVE_SRC.is_match("tracking-pixel.gif"));
        assert!(DECORATIVE_SRC.is_match("https://cdn.example.com/spacer.png"));
        assert!(!DECORATIVE_SRC.is_match("hero-banner-product.jpg"));
    }

    #[test]
    fn generic_alt_matches_placeholders() {
        assert!(GENERIC_ALT.is_match("image"));
        assert!(GENERIC_ALT.is_match("Image 1"));
        assert!(GENERIC_ALT.is_match("DSC_0042"));
        assert!(!GENERIC_ALT.is_match("Woman holding a red umbrella"));
    }

    #[test]
    fn bare_url_stops_at_trailing_punctuation_delimiters() {
        let text = "See https://example.com/offer) and (https://a.co/x.";
        let found: Vec<&str> = BARE_URL.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(found[0], "https://example.com/offer");
        assert!(found[1].starts_with("https://a.co/x"));
    }
}
