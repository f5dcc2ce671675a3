//! Report assembly.
//!
//! Collects the per-block alignments and the auxiliary audit results
//! into one serializable report and derives the overall verdict. The
//! verdict is strict about fidelity and lenient about polish: a block
//! that cannot be found, a dropped link, or a content image with no
//! alt text fail the run; partial matches, generic alt text, and
//! grammar findings are surfaced without failing it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::align::{Alignment, MatchVerdict};
use crate::grammar::GrammarOutcome;
use crate::images::{ImageCheck, Severity};
use crate::links::LinkCheck;
use crate::responsive::ResponsiveCheck;
use crate::similarity::SimilarityResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Pass,
    Fail,
}

/// One reference block and where it landed on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockMatch {
    /// The block as it appears in the reference document.
    pub block: String,
    pub verdict: MatchVerdict,
    /// The page segment the block matched best.
    pub best_segment: String,
    pub similarity: SimilarityResult,
}

/// Grammar outcomes for both sides of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarReport {
    pub document: GrammarOutcome,
    pub page: GrammarOutcome,
}

/// The complete comparison report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub overall_status: OverallStatus,
    pub target_url: String,
    pub generated_at: DateTime<Utc>,
    pub full_matches: Vec<BlockMatch>,
    pub partial_matches: Vec<BlockMatch>,
    pub not_found: Vec<BlockMatch>,
    pub links: Vec<LinkCheck>,
    pub images: Vec<ImageCheck>,
    pub grammar: GrammarReport,
    pub responsiveness: ResponsiveCheck,
}

impl ComparisonReport {
    /// Total number of reference blocks the report covers.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.full_matches.len() + self.partial_matches.len() + self.not_found.len()
    }
}

/// Build a `BlockMatch` from an alignment, consuming it.
#[must_use]
pub fn block_match(block: &str, verdict: MatchVerdict, alignment: Alignment) -> BlockMatch {
    BlockMatch {
        block: block.to_string(),
        verdict,
        best_segment: alignment.best_segment,
        similarity: alignment.similarity,
    }
}

/// Assemble the final report and derive the overall verdict.
#[must_use]
pub fn assemble(
    target_url: &str,
    blocks: Vec<BlockMatch>,
    links: Vec<LinkCheck>,
    images: Vec<ImageCheck>,
    grammar: GrammarReport,
    responsiveness: ResponsiveCheck,
) -> ComparisonReport {
    let mut full_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut not_found = Vec::new();
    for block in blocks {
        match block.verdict {
            MatchVerdict::FullMatch => full_matches.push(block),
            MatchVerdict::PartialMatch => partial_matches.push(block),
            MatchVerdict::NotFound => not_found.push(block),
        }
    }

    let missing_link = links.iter().any(|link| !link.found);
    let severe_image = images
        .iter()
        .any(|image| image.severity == Severity::High);
    let overall_status = if not_found.is_empty() && !missing_link && !severe_image {
        OverallStatus::Pass
    } else {
        OverallStatus::Fail
    };

    ComparisonReport {
        overall_status,
        target_url: target_url.to_string(),
        generated_at: Utc::now(),
        full_matches,
        partial_matches,
        not_found,
        links,
        images,
        grammar,
        responsiveness,
    }
}
