//! Link auditing.
//!
//! Verifies that every hyperlink the reference document carries is
//! present on the page. Comparison is exact string equality after UTM
//! campaign-tracking parameters are stripped from both sides; the same
//! destination with different tracking tags is the same link.

use std::collections::HashSet;

use serde::Serialize;
use url::Url;

use crate::extract::PageLink;

/// Audit outcome for one reference-document link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCheck {
    /// The link as it appears in the reference document.
    pub href: String,
    /// Whether the page carries the link (UTM-insensitively).
    pub found: bool,
    /// Whether UTM parameters were stripped from the document link.
    pub had_utm: bool,
}

/// Strip UTM-prefixed query parameters from a URL.
///
/// Keys are matched case-insensitively on the `utm` prefix. Returns
/// the stripped URL and whether any parameter was actually removed;
/// reparse normalization (lowercased host, added trailing slash) does
/// not count as stripping. On URL parse failure the whole query string
/// is dropped instead, which is the conservative reading for malformed
/// tracking links.
#[must_use]
pub fn strip_utm(href: &str) -> (String, bool) {
    match Url::parse(href) {
        Ok(mut url) => {
            let mut removed = false;
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(key, _)| {
                    if key.to_lowercase().starts_with("utm") {
                        removed = true;
                        return false;
                    }
                    true
                })
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            if kept.is_empty() {
                url.set_query(None);
            } else {
                url.query_pairs_mut().clear().extend_pairs(kept);
            }
            (url.to_string(), removed)
        }
        Err(_) => match href.split_once('?') {
            Some((base, query)) => (base.to_string(), query.to_lowercase().contains("utm")),
            None => (href.to_string(), false),
        },
    }
}

/// Compare reference-document links against the page's links.
///
/// Every document link produces exactly one `LinkCheck`; unmatched
/// links are reported with `found: false`.
#[must_use]
pub fn audit_links(document_links: &[String], page_links: &[PageLink]) -> Vec<LinkCheck> {
    let page_targets: HashSet<String> = page_links
        .iter()
        .map(|link| strip_utm(&link.href).0)
        .collect();

    document_links
        .iter()
        .map(|href| {
            let (stripped, had_utm) = strip_utm(href);
            LinkCheck {
                href: href.clone(),
                found: page_targets.contains(&stripped),
                had_utm,
            }
        })
        .collect()
}
