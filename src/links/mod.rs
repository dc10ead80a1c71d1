// src/links/mod.rs
// =============================================================================
// This module contains the link extraction engine.
//
// Submodules:
// - extract: Walks the selector matches and builds the LinkArray
// - text: Pulls visible text out of an element's source markup
// - uri: Resolves hrefs against the page's base URI
// - resource: Splits URIs into protocol and path
// - json: Turns a LinkArray into JSON objects
//
// This file defines the data types every submodule shares.
// =============================================================================

mod extract;
mod json;
mod resource;
mod text;
mod uri;

use serde::{Deserialize, Serialize};

pub use extract::get_matching_links;
pub use json::{get_matching_links_as_json, link_to_json, links_to_json};
pub use resource::Resource;
pub use text::inner_text;
pub use uri::{directory_of, resolve_uri, site_root};

/// A hyperlink harvested from a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The resolved link target
    pub uri: String,
    /// The element's `title` attribute, if it had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The cleaned visible text, never empty
    pub text: String,
}

/// One position in a LinkArray
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkSlot {
    /// The matched node produced a link
    Populated(Link),
    /// The matched node wasn't an anchor, or didn't yield a link
    #[default]
    Empty,
}

impl LinkSlot {
    pub fn link(&self) -> Option<&Link> {
        match self {
            LinkSlot::Populated(link) => Some(link),
            LinkSlot::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LinkSlot::Empty)
    }
}

// The links found for one selector, one slot per selector match
//
// The length always equals the number of nodes the selector matched, links
// or not, so slot i belongs to match i. Slots are fixed once the array is
// built: nothing is resized, compacted or reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkArray {
    slots: Box<[LinkSlot]>,
}

impl LinkArray {
    /// An array of `len` empty slots
    pub fn with_len(len: usize) -> Self {
        LinkArray {
            slots: vec![LinkSlot::Empty; len].into_boxed_slice(),
        }
    }

    // Stores a link in slot `index`. Out-of-range indices are ignored.
    pub(crate) fn fill(&mut self, index: usize, link: Link) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = LinkSlot::Populated(link);
        }
    }

    /// Number of slots (selector matches), not number of links
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LinkSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkSlot> {
        self.slots.iter()
    }

    /// The populated slots only, in order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.slots.iter().filter_map(LinkSlot::link)
    }

    pub fn populated_count(&self) -> usize {
        self.links().count()
    }
}

impl<'a> IntoIterator for &'a LinkArray {
    type Item = &'a LinkSlot;
    type IntoIter = std::slice::Iter<'a, LinkSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
