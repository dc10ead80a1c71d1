// src/lib.rs
// =============================================================================
// link-harvester: pull titled, resolved hyperlinks out of HTML pages.
//
// Modules:
// - dom: HTML parsing, CSS selection and source positions
// - links: The extraction engine (text, URIs, LinkArray, JSON)
// - fetch: Downloading pages
// - service: Configured web search services
// - error: Error types
//
// The main entry point is `get_matching_links`, a pure function from
// (HTML, link selector, title selector, base URI) to a LinkArray.
// =============================================================================

pub mod dom;
pub mod error;
pub mod fetch;
pub mod links;
pub mod service;

pub use error::{ExtractError, ResourceError, ServiceError};
pub use links::{get_matching_links, get_matching_links_as_json, Link, LinkArray, LinkSlot};
