//! Bidirectional word-overlap scoring between two text spans.
//!
//! Matching is set-based: multiplicity is ignored, so a token present
//! once in the candidate satisfies any number of occurrences in the
//! reference. `score(A, B)` and `score(B, A)` yield swapped
//! precision/recall pairs; downstream code relies on both directions.

use std::collections::HashSet;

use serde::Serialize;

use crate::normalize::normalize;

/// Result of word-overlap scoring between two text spans.
///
/// Derived, not stored; recomputed per comparison pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// Matched / unique reference tokens.
    pub precision: f64,
    /// Matched / unique candidate tokens.
    pub recall: f64,
    /// Harmonic mean of precision and recall (0 when both are 0).
    pub f1: f64,
    /// Reference tokens found anywhere in the candidate, in first-seen order.
    pub matched_words: Vec<String>,
    /// Reference tokens absent from the candidate, in first-seen order.
    pub unmatched_words: Vec<String>,
    /// Candidate tokens absent from the reference, in first-seen order.
    pub extra_words: Vec<String>,
}

impl SimilarityResult {
    /// Zero score with empty word lists.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Tokenize text into comparison words.
///
/// Normalizes, splits on spaces, and discards empty tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score reference text `text_a` against candidate text `text_b`.
///
/// Returns a zero result when `text_a` tokenizes to no words.
///
/// # Examples
///
/// ```
/// use copyaudit::similarity::score;
///
/// let result = score("Sign up today", "Sign up today for 20% off");
/// assert_eq!(result.precision, 1.0);
/// assert!(result.recall < 1.0);
/// ```
#[must_use]
pub fn score(text_a: &str, text_b: &str) -> SimilarityResult {
    let tokens_a = tokenize(text_a);
    if tokens_a.is_empty() {
        return SimilarityResult::zero();
    }
    let tokens_b = tokenize(text_b);

    let set_b: HashSet<&str> = tokens_b.iter().map(String::as_str).collect();
    let set_a: HashSet<&str> = tokens_a.iter().map(String::as_str).collect();

    // Walk tokens in order, deduplicating, so word diffs read naturally.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut matched_words = Vec::new();
    let mut unmatched_words = Vec::new();
    for token in &tokens_a {
        if !seen.insert(token.as_str()) {
            continue;
        }
        if set_b.contains(token.as_str()) {
            matched_words.push(token.clone());
        } else {
            unmatched_words.push(token.clone());
        }
    }

    let mut seen_b: HashSet<&str> = HashSet::new();
    let mut extra_words = Vec::new();
    for token in &tokens_b {
        if seen_b.insert(token.as_str()) && !set_a.contains(token.as_str()) {
            extra_words.push(token.clone());
        }
    }

    let matched = matched_words.len() as f64;
    let unique_a = seen.len() as f64;
    let unique_b = set_b.len() as f64;

    let precision = if unique_a > 0.0 { matched / unique_a } else { 0.0 };
    let recall = if unique_b > 0.0 { matched / unique_b } else { 0.0 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    SimilarityResult {
        precision,
        recall,
        f1,
        matched_words,
        unmatched_words,
        extra_words,
    }
}
