//! Content extraction from fetched page HTML.
//!
//! Turns the final rendered markup into the flat text, structural
//! paragraphs, hyperlinks, and images the comparison stages consume.
//! Non-rendered elements are removed before any text is read so they
//! never contribute to word counts or paragraph sets.

use serde::Serialize;

use crate::dom::{self, Document, Selection};
use crate::normalize::collapse_whitespace;

/// Elements that never render text and must be dropped before extraction.
const NO_RENDER_SELECTOR: &str = "script, style, noscript, template, iframe, head";

/// Block-level elements that yield structural paragraphs.
const PARAGRAPH_SELECTOR: &str =
    "p, h1, h2, h3, h4, h5, h6, li, td, th, blockquote, caption, figcaption";

/// Block elements whose presence inside a table cell disqualifies the
/// cell itself (the children are counted instead of the container).
const NESTED_BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li, blockquote";

/// A hyperlink found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Trimmed visible anchor text.
    pub text: String,
    /// Raw href attribute value.
    pub href: String,
}

/// An image found on the page.
///
/// `alt: None` means the attribute is absent from the markup;
/// `Some("")` means present but empty. The image audit depends on the
/// distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageImage {
    /// Raw src attribute value.
    pub src: String,
    /// Alt attribute, when present.
    pub alt: Option<String>,
    /// Width attribute, when present (used for the 1x1 decorative test).
    pub width: Option<String>,
    /// Height attribute, when present.
    pub height: Option<String>,
}

/// Everything the comparison stages need from a rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// All visible text, whitespace-collapsed.
    pub flat_text: String,
    /// Deduplicated block-level paragraphs, in page order.
    pub paragraphs: Vec<String>,
    /// Anchors with a non-empty href.
    pub links: Vec<PageLink>,
    /// Images with a non-empty src.
    pub images: Vec<PageImage>,
}

/// Extract comparison content from final page HTML.
///
/// `min_paragraph_len` filters out stub paragraphs (single words,
/// fragment cells) that would only add noise to alignment.
#[must_use]
pub fn extract_content(html: &str, min_paragraph_len: usize) -> PageContent {
    let doc = Document::from(html);
    doc.select(NO_RENDER_SELECTOR).remove();

    let body = doc.select("body");
    let flat_text = if body.length() > 0 {
        collapse_whitespace(&dom::text_content(&body))
    } else {
        collapse_whitespace(&dom::text_content(&doc.select("html")))
    };

    let paragraphs = extract_paragraphs(&doc, min_paragraph_len);
    let links = extract_links(&doc);
    let images = extract_images(&doc);

    PageContent {
        flat_text,
        paragraphs,
        links,
        images,
    }
}

/// Extract deduplicated block-level paragraphs in document order.
fn extract_paragraphs(doc: &Document, min_len: usize) -> Vec<String> {
    let mut retained: Vec<String> = Vec::new();

    for node in doc.select(PARAGRAPH_SELECTOR).nodes() {
        let sel = Selection::from(*node);

        // A table cell that contains nested block elements is a layout
        // container; its children are collected on their own.
        if let Some(tag) = dom::tag_name(&sel) {
            if (tag == "td" || tag == "th") && sel.select(NESTED_BLOCK_SELECTOR).length() > 0 {
                continue;
            }
        }

        let text = collapse_whitespace(&dom::text_content(&sel));
        if text.len() <= min_len {
            continue;
        }
        push_deduplicated(&mut retained, text);
    }

    retained
}

/// Containment-based deduplication, order preserving.
///
/// A new paragraph that is a substring of a retained one is dropped; a
/// new paragraph that contains a retained one replaces it in place.
fn push_deduplicated(retained: &mut Vec<String>, text: String) {
    if retained.iter().any(|kept| kept.contains(text.as_str())) {
        return;
    }
    if let Some(pos) = retained
        .iter()
        .position(|kept| text.len() > kept.len() && text.contains(kept.as_str()))
    {
        retained[pos] = text;
        return;
    }
    retained.push(text);
}

fn extract_links(doc: &Document) -> Vec<PageLink> {
    let mut links = Vec::new();
    for node in doc.select("a[href]").nodes() {
        let sel = Selection::from(*node);
        let Some(href) = dom::get_attribute(&sel, "href") else {
            continue;
        };
        if href.trim().is_empty() {
            continue;
        }
        links.push(PageLink {
            text: collapse_whitespace(&dom::text_content(&sel)),
            href,
        });
    }
    links
}

fn extract_images(doc: &Document) -> Vec<PageImage> {
    let mut images = Vec::new();
    for node in doc.select("img").nodes() {
        let sel = Selection::from(*node);
        let src = dom::get_attribute(&sel, "src").unwrap_or_default();
        if src.trim().is_empty() {
            continue;
        }
        let alt = if dom::has_attribute(&sel, "alt") {
            Some(dom::get_attribute(&sel, "alt").unwrap_or_default())
        } else {
            None
        };
        images.push(PageImage {
            src,
            alt,
            width: dom::get_attribute(&sel, "width"),
            height: dom::get_attribute(&sel, "height"),
        });
    }
    images
}
