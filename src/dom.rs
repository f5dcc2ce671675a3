//! DOM operations adapter.
//!
//! Thin wrappers over the `dom_query` crate used by the content
//! extractor and auditors. Attribute presence and attribute value are
//! distinct operations here because the image audit must tell an
//! absent `alt` apart from a present-but-empty one.

// Re-export core types for internal use
pub use dom_query::{Document, Selection};

/// Get an attribute value as an owned string.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check whether an attribute exists, regardless of its value.
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Get the lowercase tag name of the first node in the selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// Get all text content of the selection and its descendants.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> String {
    sel.text().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_attribute_distinguishes_absent_from_empty() {
        let doc = Document::from(r#"<img src="a.png"><img src="b.png" alt="">"#);
        let imgs = doc.select("img");
        let nodes = imgs.nodes();

        let first = Selection::from(nodes[0]);
        assert!(!has_attribute(&first, "alt"));
        assert_eq!(get_attribute(&first, "alt"), None);

        let second = Selection::from(nodes[1]);
        assert!(has_attribute(&second, "alt"));
        assert_eq!(get_attribute(&second, "alt"), Some(String::new()));
    }

    #[test]
    fn tag_name_is_lowercase() {
        let doc = Document::from("<DIV><P>x</P></DIV>");
        let p = doc.select("p");
        assert_eq!(tag_name(&p), Some("p".to_string()));
    }

    #[test]
    fn text_content_includes_descendants() {
        let doc = Document::from("<div>a<span>b</span></div>");
        assert_eq!(text_content(&doc.select("div")), "ab");
    }
}
