//! Paragraph alignment.
//!
//! Finds, for one reference block, the page segment that best accounts
//! for its words. This is a greedy local search: single paragraphs
//! first, then short runs of adjacent paragraphs, then a windowed scan
//! of the flat page text when structure gives nothing usable. When
//! candidates tie on score, the first one found wins.

use serde::Serialize;

use crate::options::Options;
use crate::similarity::{score, SimilarityResult};

/// Classification of one reference block against the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchVerdict {
    /// The block's words are essentially all present.
    FullMatch,
    /// Most of the block is present, with noticeable drift.
    PartialMatch,
    /// The block could not be located on the page.
    NotFound,
}

/// Best page segment found for a reference block.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// The winning page segment (empty when nothing matched).
    pub best_segment: String,
    /// Scoring detail for the winning segment.
    pub similarity: SimilarityResult,
}

impl Alignment {
    fn consider(&mut self, segment: &str, result: SimilarityResult) {
        if result.f1 > self.similarity.f1 {
            self.best_segment = segment.to_string();
            self.similarity = result;
        }
    }
}

/// Classify an alignment f1 into a verdict using configured thresholds.
#[must_use]
pub fn classify(f1: f64, options: &Options) -> MatchVerdict {
    if f1 >= options.full_match_threshold {
        MatchVerdict::FullMatch
    } else if f1 >= options.partial_match_threshold {
        MatchVerdict::PartialMatch
    } else {
        MatchVerdict::NotFound
    }
}

/// Find the best-matching page segment for one reference block.
///
/// Priority order:
/// 1. every individual paragraph;
/// 2. every run of 2 and 3 consecutive paragraphs (a reference block
///    often spans several short page paragraphs), kept only on strict
///    improvement;
/// 3. when the best f1 is still under `Options::contextual_floor` and
///    at least one block word occurs in the flat text, a fixed-size
///    character window around the first matched word, again kept only
///    on strict improvement.
#[must_use]
pub fn align(block: &str, paragraphs: &[String], flat_text: &str, options: &Options) -> Alignment {
    let mut best = Alignment::default();

    for paragraph in paragraphs {
        best.consider(paragraph, score(block, paragraph));
    }

    for window in [2usize, 3] {
        if paragraphs.len() < window {
            continue;
        }
        for run in paragraphs.windows(window) {
            let combined = run.join(" ");
            best.consider(&combined, score(block, &combined));
        }
    }

    if best.similarity.f1 < options.contextual_floor {
        if let Some(candidate) = contextual_window(block, flat_text, options.contextual_padding) {
            best.consider(&candidate, score(block, &candidate));
        }
    }

    best
}

/// Extract the contextual fallback window from the flat page text.
///
/// Locates the first block word present in the flat text and takes
/// `padding` characters each side plus the block's own length. Returns
/// `None` when no block word occurs in the flat text at all.
fn contextual_window(block: &str, flat_text: &str, padding: usize) -> Option<String> {
    let against_flat = score(block, flat_text);
    let first_word = against_flat.matched_words.first()?;

    // Byte offsets must refer to flat_text itself; lowercasing the
    // whole haystack first can shift them (some characters change
    // byte length when lowercased).
    let pos = find_case_insensitive(flat_text, first_word)?;

    let start = floor_char_boundary(flat_text, pos.saturating_sub(padding));
    let end = ceil_char_boundary(flat_text, (pos + block.len() + padding).min(flat_text.len()));
    Some(flat_text[start..end].to_string())
}

/// Byte offset of the first case-insensitive occurrence of `needle`
/// in `haystack`, measured in the original string.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .char_indices()
        .map(|(idx, _)| idx)
        .find(|&idx| starts_with_case_insensitive(&haystack[idx..], needle))
}

fn starts_with_case_insensitive(slice: &str, needle: &str) -> bool {
    let mut hay = slice.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|n| hay.next() == Some(n))
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options::default()
    }

    fn paragraphs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn single_paragraph_exact_match_wins() {
        let paras = paragraphs(&["Completely unrelated text", "Sign up today for 20% off"]);
        let alignment = align("Sign up today for 20% off", &paras, "", &options());
        assert_eq!(alignment.best_segment, "Sign up today for 20% off");
        assert_eq!(alignment.similarity.f1, 1.0);
    }

    #[test]
    fn two_paragraph_combination_beats_either_single() {
        let paras = paragraphs(&["Sign up today", "for 20% off your order"]);
        let block = "Sign up today for 20% off";

        let single_best = paras
            .iter()
            .map(|p| score(block, p).f1)
            .fold(0.0_f64, f64::max);
        let alignment = align(block, &paras, "", &options());

        assert_eq!(alignment.best_segment, "Sign up today for 20% off your order");
        assert!(alignment.similarity.f1 > single_best);
    }

    #[test]
    fn three_paragraph_combination_is_considered() {
        let paras = paragraphs(&["Sign up", "today for", "20% off"]);
        let alignment = align("Sign up today for 20% off", &paras, "", &options());
        assert_eq!(alignment.best_segment, "Sign up today for 20% off");
        assert_eq!(alignment.similarity.f1, 1.0);
    }

    #[test]
    fn ties_keep_the_first_candidate_found() {
        // Both paragraphs score identically; the earlier one must win.
        let paras = paragraphs(&["alpha beta gamma", "gamma beta alpha"]);
        let alignment = align("alpha beta gamma", &paras, "", &options());
        assert_eq!(alignment.best_segment, "alpha beta gamma");
    }

    #[test]
    fn contextual_window_rescues_unstructured_text() {
        // No paragraph shares vocabulary with the block, but the flat
        // text contains it (e.g. copy rendered outside block elements).
        let paras = paragraphs(&["Navigation menu entries", "Footer copyright notice"]);
        let flat = "header stuff ... limited summer discount runs through august ... footer";
        let alignment = align("limited summer discount runs through august", &paras, flat, &options());
        // The window drags in surrounding flat-text words, so recall is
        // imperfect, but precision is 1.0 and f1 clears the floor.
        assert!(alignment.similarity.precision == 1.0);
        assert!(alignment.similarity.f1 > options().contextual_floor);
        assert!(alignment.best_segment.contains("limited summer discount"));
    }

    #[test]
    fn no_match_anywhere_yields_empty_alignment() {
        let paras = paragraphs(&["totally different words"]);
        let alignment = align("reference copy block", &paras, "unrelated flat text", &options());
        assert_eq!(alignment.best_segment, "");
        assert_eq!(alignment.similarity.f1, 0.0);
    }

    #[test]
    fn classify_uses_configured_thresholds() {
        let opts = options();
        assert_eq!(classify(0.95, &opts), MatchVerdict::FullMatch);
        assert_eq!(classify(0.9, &opts), MatchVerdict::FullMatch);
        assert_eq!(classify(0.8, &opts), MatchVerdict::PartialMatch);
        assert_eq!(classify(0.7, &opts), MatchVerdict::PartialMatch);
        assert_eq!(classify(0.69, &opts), MatchVerdict::NotFound);
        assert_eq!(classify(0.0, &opts), MatchVerdict::NotFound);
    }

    #[test]
    fn contextual_window_respects_char_boundaries() {
        let flat = "é".repeat(300) + " target word here " + &"ü".repeat(300);
        let alignment = align("target word here", &[], &flat, &options());
        assert!(alignment.best_segment.contains("target word"));
    }

    #[test]
    fn contextual_window_stays_anchored_across_case_changing_characters() {
        // U+0130 grows by a byte when lowercased; a window positioned
        // via a lowercased copy would land past the matched word.
        let flat = "\u{130}".repeat(200) + " target word here";
        let alignment = align("target word here", &[], &flat, &options());
        assert!(alignment.best_segment.contains("target word here"));
        assert_eq!(alignment.similarity.precision, 1.0);
    }

    #[test]
    fn case_insensitive_find_reports_original_offsets() {
        assert_eq!(find_case_insensitive("Big SALE now", "sale"), Some(4));
        assert_eq!(find_case_insensitive("nothing here", "sale"), None);
    }
}
