//! Image accessibility auditing.
//!
//! Classifies every page image by alt-text status and assigns a
//! severity. Decorative images (tracking pixels, spacers, 1x1 frames)
//! are held to a looser standard than content images; the absent
//! versus empty `alt` distinction from extraction matters here, since
//! `alt=""` is the correct markup for decoration.

use serde::Serialize;

use crate::extract::PageImage;
use crate::patterns::{DECORATIVE_SRC, GENERIC_ALT};

/// How much an image finding should weigh on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Alt-text classification for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AltStatus {
    /// Usable alt text, or correctly empty on a decorative image.
    Ok,
    /// No `alt` attribute at all.
    Missing,
    /// `alt=""` on a content image.
    Empty,
    /// Alt text that describes nothing ("image", "photo", a filename).
    Generic,
}

/// Audit outcome for one page image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCheck {
    pub src: String,
    pub alt: Option<String>,
    /// Whether the image looks decorative rather than content.
    pub decorative: bool,
    pub status: AltStatus,
    pub severity: Severity,
}

fn is_decorative(image: &PageImage) -> bool {
    if DECORATIVE_SRC.is_match(&image.src) {
        return true;
    }
    matches!(
        (image.width.as_deref(), image.height.as_deref()),
        (Some("1"), Some("1"))
    )
}

fn classify(image: &PageImage, decorative: bool) -> (AltStatus, Severity) {
    match image.alt.as_deref() {
        None if decorative => (AltStatus::Missing, Severity::Low),
        None => (AltStatus::Missing, Severity::High),
        Some("") if decorative => (AltStatus::Ok, Severity::Low),
        Some("") => (AltStatus::Empty, Severity::Medium),
        Some(alt) if GENERIC_ALT.is_match(alt) => (AltStatus::Generic, Severity::Medium),
        Some(_) => (AltStatus::Ok, Severity::Low),
    }
}

/// Classify every page image.
#[must_use]
pub fn audit_images(images: &[PageImage]) -> Vec<ImageCheck> {
    images
        .iter()
        .map(|image| {
            let decorative = is_decorative(image);
            let (status, severity) = classify(image, decorative);
            ImageCheck {
                src: image.src.clone(),
                alt: image.alt.clone(),
                decorative,
                status,
                severity,
            }
        })
        .collect()
}
