// src/fetch/mod.rs
// =============================================================================
// This module handles downloading pages.
//
// Extraction itself never touches the network; this is the layer that
// gets the HTML (and the base URI that goes with it) to the extractor.
// =============================================================================

mod page;

pub use page::{build_client, fetch_page, fetch_pages, get_links};
