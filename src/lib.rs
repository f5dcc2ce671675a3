//! # copyaudit
//!
//! Content fidelity comparison between a reference document and a live
//! landing page.
//!
//! Given the approved copy for a page (text plus links, as exported
//! from a word-processing document) and the page's URL, this library
//! fetches the live page through whatever redirect chain fronts it,
//! extracts its rendered text, and reports how faithfully the page
//! reproduces the copy: which blocks match fully, partially, or not at
//! all, which links were dropped, and which images ship without alt
//! text. Grammar and responsiveness checks run alongside as
//! best-effort audits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use copyaudit::{audit, ReferenceDocument};
//!
//! # async fn run() -> copyaudit::Result<()> {
//! let document = ReferenceDocument {
//!     text: "Our summer sale starts Monday.\n\nSave up to 40% storewide.".to_string(),
//!     html: String::new(),
//! };
//! let report = audit(&document, "https://example.com/landing").await?;
//! println!("{:?}", report.overall_status);
//! println!("{} blocks not found", report.not_found.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Block Alignment**: Locates each reference block on the page,
//!   trying single paragraphs, consecutive-paragraph combinations, and
//!   a contextual window over the flat text
//! - **Resilient Fetching**: Manual redirect following (status codes,
//!   script redirects, meta refresh) with cross-hop cookies and
//!   exponential-backoff retry
//! - **Link and Image Audits**: UTM-insensitive link verification and
//!   alt-text classification
//! - **Auxiliary Checks**: Grammar (via a LanguageTool-style endpoint)
//!   and mobile responsiveness, both degrading instead of failing

mod error;
mod options;
mod patterns;

/// Block alignment between reference blocks and page paragraphs.
pub mod align;

/// Reference-document parsing (block splitting, link extraction).
pub mod document;

/// DOM operations adapter over dom_query.
pub mod dom;

/// Page content extraction (flat text, paragraphs, links, images).
pub mod extract;

/// Redirect-following, cookie-carrying, retrying page fetcher.
pub mod fetch;

/// Grammar checking through a LanguageTool-compatible endpoint.
pub mod grammar;

/// Image alt-text auditing.
pub mod images;

/// Link auditing with UTM stripping.
pub mod links;

/// Text normalization for comparison.
pub mod normalize;

/// Report assembly and the overall verdict.
pub mod report;

/// Mobile-responsiveness heuristic.
pub mod responsive;

/// Word-overlap similarity scoring.
pub mod similarity;

// Public API - re-exports
pub use align::MatchVerdict;
pub use document::{ReferenceDocument, TempUpload};
pub use error::{Error, Result};
pub use fetch::{FetchResult, Fetcher};
pub use options::Options;
pub use report::{ComparisonReport, OverallStatus};

use grammar::GrammarClient;
use report::GrammarReport;

/// Compare a reference document against a live page using default
/// options.
///
/// # Errors
///
/// Returns [`Error::Input`] for an empty document or an invalid URL,
/// [`Error::Fetch`] when the page cannot be retrieved after retries,
/// and [`Error::Parse`] when the document yields no usable blocks.
pub async fn audit(document: &ReferenceDocument, target_url: &str) -> Result<ComparisonReport> {
    audit_with_options(document, target_url, &Options::default()).await
}

/// Compare a reference document against a live page with custom
/// options.
///
/// Auxiliary checks (grammar, responsiveness) never fail the audit;
/// their problems are recorded in the report instead.
///
/// # Errors
///
/// Returns [`Error::Input`] for an empty document or an invalid URL,
/// [`Error::Fetch`] when the page cannot be retrieved after retries,
/// and [`Error::Parse`] when the document yields no usable blocks.
pub async fn audit_with_options(
    document: &ReferenceDocument,
    target_url: &str,
    options: &Options,
) -> Result<ComparisonReport> {
    if document.text.trim().is_empty() {
        return Err(Error::Input("reference document is empty".to_string()));
    }
    let parsed = url::Url::parse(target_url)
        .map_err(|e| Error::Input(format!("invalid target URL {target_url:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Input(format!(
            "unsupported URL scheme {:?}",
            parsed.scheme()
        )));
    }

    let blocks = document::split_blocks(&document.text, options.min_block_len)?;
    log::info!(
        "auditing {target_url} against {} reference blocks",
        blocks.len()
    );

    let fetcher = Fetcher::new(options)?;
    let fetched = fetcher.fetch(target_url).await?;
    log::debug!(
        "fetched {} ({} paragraphs, {} links, {} images)",
        fetched.final_url,
        fetched.content.paragraphs.len(),
        fetched.content.links.len(),
        fetched.content.images.len()
    );

    let block_matches: Vec<report::BlockMatch> = blocks
        .iter()
        .map(|block| {
            let alignment = align::align(
                &block.content,
                &fetched.content.paragraphs,
                &fetched.content.flat_text,
                options,
            );
            let verdict = align::classify(alignment.similarity.f1, options);
            report::block_match(&block.content, verdict, alignment)
        })
        .collect();

    let document_links = document::extract_links(document);
    let link_checks = links::audit_links(&document_links, &fetched.content.links);
    let image_checks = images::audit_images(&fetched.content.images);

    let grammar_client = GrammarClient::new(options)?;
    let (document_grammar, page_grammar) = tokio::join!(
        grammar_client.check(&document.text),
        grammar_client.check(&fetched.content.flat_text),
    );
    let responsiveness = responsive::check_responsiveness(&fetched.html);

    let report = report::assemble(
        &fetched.final_url,
        block_matches,
        link_checks,
        image_checks,
        GrammarReport {
            document: document_grammar,
            page: page_grammar,
        },
        responsiveness,
    );
    log::info!(
        "audit of {target_url} finished: {:?} ({} full, {} partial, {} not found)",
        report.overall_status,
        report.full_matches.len(),
        report.partial_matches.len(),
        report.not_found.len()
    );
    Ok(report)
}
