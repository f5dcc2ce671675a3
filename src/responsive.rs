//! Mobile-responsiveness heuristic.
//!
//! A static-HTML approximation: a page is considered responsive when
//! it declares a viewport meta tag and its inline styles carry at
//! least one media query. Pages that load all styling externally can
//! still pass on the viewport tag alone.

use serde::Serialize;

use crate::dom::Document;
use crate::patterns::MEDIA_QUERY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponsiveVerdict {
    Responsive,
    NotResponsive,
}

/// Outcome of the responsiveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponsiveCheck {
    /// Whether a `<meta name="viewport">` tag is present.
    pub viewport_meta: bool,
    /// Number of `@media` blocks found in inline styles.
    pub media_queries: usize,
    pub verdict: ResponsiveVerdict,
}

/// Scan raw HTML for responsiveness signals.
#[must_use]
pub fn check_responsiveness(html: &str) -> ResponsiveCheck {
    let document = Document::from(html);
    let viewport_meta = document.select(r#"meta[name="viewport"]"#).length() > 0;

    let mut media_queries = 0;
    for node in document.select("style").nodes() {
        let css = crate::dom::text_content(&crate::dom::Selection::from(*node));
        media_queries += MEDIA_QUERY.find_iter(&css).count();
    }

    let verdict = if viewport_meta {
        ResponsiveVerdict::Responsive
    } else {
        ResponsiveVerdict::NotResponsive
    };
    ResponsiveCheck {
        viewport_meta,
        media_queries,
        verdict,
    }
}
