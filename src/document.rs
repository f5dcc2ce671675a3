//! Reference-document handling.
//!
//! The binary document format is parsed upstream; this module consumes
//! the resulting raw text and inline HTML, splitting the text into
//! comparison blocks and collecting every hyperlink the document
//! expects the page to carry.

use std::path::{Path, PathBuf};

use crate::dom::{self, Document, Selection};
use crate::error::{Error, Result};
use crate::normalize::collapse_whitespace;
use crate::patterns;

/// Parsed reference document, as produced by the upstream parser.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDocument {
    /// Raw extracted text.
    pub text: String,
    /// Inline HTML rendering of the document (anchors preserved).
    pub html: String,
}

/// A contiguous unit of reference-document text.
///
/// Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Block text, whitespace-collapsed.
    pub content: String,
}

/// Split reference text into comparison blocks.
///
/// Blocks are delimited by blank lines; anything shorter than
/// `min_len` characters after whitespace collapsing is discarded.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text is empty or when every block
/// falls under `min_len`. An audit over zero blocks would pass
/// vacuously, so a document that yields none is rejected outright.
pub fn split_blocks(text: &str, min_len: usize) -> Result<Vec<TextBlock>> {
    if text.trim().is_empty() {
        return Err(Error::Parse("reference document has no text".to_string()));
    }
    let blocks: Vec<TextBlock> = patterns::BLOCK_BOUNDARY
        .split(text)
        .map(collapse_whitespace)
        .filter(|block| block.len() >= min_len)
        .map(|content| TextBlock { content })
        .collect();
    if blocks.is_empty() {
        return Err(Error::Parse(
            "reference document has no usable text blocks".to_string(),
        ));
    }
    Ok(blocks)
}

/// Collect the hyperlinks a reference document carries.
///
/// Anchors in the inline HTML come first, then bare URLs found in the
/// raw text; duplicates are dropped while preserving first-seen order.
#[must_use]
pub fn extract_links(document: &ReferenceDocument) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let mut push = |href: String| {
        if !href.trim().is_empty() && !links.contains(&href) {
            links.push(href);
        }
    };

    if !document.html.is_empty() {
        let doc = Document::from(document.html.as_str());
        for node in doc.select("a[href]").nodes() {
            let sel = Selection::from(*node);
            if let Some(href) = dom::get_attribute(&sel, "href") {
                push(href);
            }
        }
    }

    for m in patterns::BARE_URL.find_iter(&document.text) {
        push(m.as_str().trim_end_matches(['.', ',']).to_string());
    }

    links
}

/// Drop guard for an uploaded temporary input file.
///
/// The file is removed when the guard goes out of scope, covering the
/// success path, business errors, and panics alike.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Take ownership of a temporary file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the guarded file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            // Nothing to do beyond logging; the file may already be gone.
            log::debug!("temp upload cleanup failed for {:?}: {e}", self.path);
        }
    }
}
