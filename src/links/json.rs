// src/links/json.rs
// =============================================================================
// This module turns extracted links into JSON.
//
// Each populated slot becomes one object:
//
//   {"protocol": "https", "path": "host.example/a/c.html", "text": "Next"}
//
// Empty slots are skipped without a word. A link whose URI can't be split
// into protocol and path (e.g. a relative href kept because there was no
// base URI) is logged and skipped; the others still make it out.
// =============================================================================

use log::warn;
use serde::Serialize;
use serde_json::Value;

use super::extract::get_matching_links;
use super::resource::Resource;
use super::{Link, LinkArray};

// The JSON shape of one link
#[derive(Debug, Serialize)]
struct LinkResource<'a> {
    protocol: &'a str,
    path: &'a str,
    text: &'a str,
}

// Converts one link into its JSON object
//
// Returns: None (after logging a warning) if the URI has no protocol
pub fn link_to_json(link: &Link) -> Option<Value> {
    let resource = match Resource::parse(&link.uri) {
        Ok(resource) => resource,
        Err(e) => {
            warn!("Failed to get json for {}: {}", link.uri, e);
            return None;
        }
    };

    let object = LinkResource {
        protocol: &resource.protocol,
        path: &resource.path,
        text: &link.text,
    };

    match serde_json::to_value(object) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to add link for {} to json array: {}", link.uri, e);
            None
        }
    }
}

/// JSON objects for every populated slot that converts cleanly, in order
pub fn links_to_json(links: &LinkArray) -> Vec<Value> {
    links.links().filter_map(link_to_json).collect()
}

// Extracts links and returns them as a JSON array in one go
//
// Same parameters as get_matching_links. Returns None if extraction
// itself failed (bad selector).
pub fn get_matching_links_as_json(
    html: &str,
    link_selector: &str,
    title_selector: &str,
    base_uri: Option<&str>,
) -> Option<Value> {
    match get_matching_links(html, link_selector, title_selector, base_uri) {
        Some(links) => Some(Value::Array(links_to_json(&links))),
        None => {
            warn!("Failed to get html links");
            None
        }
    }
}
