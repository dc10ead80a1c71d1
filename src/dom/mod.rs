// src/dom/mod.rs
// =============================================================================
// This module is the boundary between raw HTML and the link extractor.
//
// Submodules:
// - select: Parses HTML with scraper and evaluates CSS selectors
// - source: Indexes element positions in the original HTML text
//
// The extractor only ever sees `Node`s: a tag name, the attributes and,
// when the element really appears in the source, where its markup is.
// =============================================================================

mod select;
mod source;

use std::collections::HashMap;

pub use select::select_nodes;
pub use source::{SourceElement, SourceIndex, SourceSpan};
pub(crate) use source::{is_space, is_void_element};

/// A matched element, as seen by the link extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag_name: String,
    attributes: HashMap<String, String>,
    span: Option<SourceSpan>,
}

impl Node {
    pub fn new(tag_name: impl Into<String>, attributes: HashMap<String, String>, span: Option<SourceSpan>) -> Self {
        Node {
            tag_name: tag_name.into(),
            attributes,
            span,
        }
    }

    // Builds a node from an element found in the source text
    pub(crate) fn from_source(element: &SourceElement) -> Self {
        Node::new(
            element.name.clone(),
            element.attributes.iter().cloned().collect(),
            Some(element.span),
        )
    }

    /// Tag name as written in the source
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Attribute lookup. Keys are case-sensitive: "href" and "HREF" differ.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Where the element's markup sits in the source, if it is there at all
    pub fn span(&self) -> Option<SourceSpan> {
        self.span
    }

    /// True for `<a>` elements, whatever the case
    pub fn is_anchor(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("a")
    }
}
