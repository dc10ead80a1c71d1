// src/links/extract.rs
// =============================================================================
// This module ties selection, text extraction and URI resolution together.
//
// How it works:
// 1. Run the link selector over the page
// 2. Make a LinkArray with one empty slot per match
// 3. For each match that is an <a> with an href, get its text
// 4. If there is text, resolve the href and fill the slot
//
// Matches that aren't anchors, or anchors that fail any step, leave their
// slot empty, so slot i always lines up with match i.
// =============================================================================

use log::{debug, error};

use super::text::inner_text;
use super::uri::resolve_uri;
use super::{Link, LinkArray};
use crate::dom::{select_nodes, Node};

// Extracts the links matched by a selector
//
// Parameters:
//   html: the page's HTML
//   link_selector: CSS selector for the anchors (or for elements around them)
//   title_selector: accepted for compatibility; titles only ever come from
//                   the anchor's own `title` attribute
//   base_uri: the page's URI, used to resolve relative hrefs. None keeps
//             hrefs exactly as written.
//
// Returns: Some(LinkArray) with one slot per selector match, or None if
//          the selector doesn't parse
//
// Example:
//   html = "<ul><li><a href='/docs'>Docs</a></li><li>plain</li></ul>"
//   link_selector = "li a, li"
//   base_uri = Some("https://example.com/index.html")
//   result: 3 slots, one holding https://example.com/docs
pub fn get_matching_links(
    html: &str,
    link_selector: &str,
    title_selector: &str,
    base_uri: Option<&str>,
) -> Option<LinkArray> {
    let nodes = match select_nodes(html, link_selector) {
        Ok(nodes) => nodes,
        Err(e) => {
            error!("{}", e);
            return None;
        }
    };

    debug!(
        "Extracting from {} match(es) for '{}' (title selector '{}' is not consulted)",
        nodes.len(),
        link_selector,
        title_selector
    );

    let mut links = LinkArray::with_len(nodes.len());

    for (index, node) in nodes.iter().enumerate() {
        if let Some(link) = extract_link(node, html, base_uri) {
            links.fill(index, link);
        }
    }

    Some(links)
}

// Builds the Link for one matched node, if it makes one
fn extract_link(node: &Node, source: &str, base_uri: Option<&str>) -> Option<Link> {
    if !node.is_anchor() {
        return None;
    }

    let href = node.attribute("href").or_else(|| node.attribute("HREF"))?;

    // Anchors without visible text are skipped, even with a good href
    let text = inner_text(node, source, false)?;

    // Only the lowercase attribute counts here, unlike href
    let title = node.attribute("title").map(str::to_string);

    let uri = match resolve_uri(href, base_uri) {
        Some(uri) => uri,
        None => {
            debug!("Could not resolve '{}' against {:?}", href, base_uri);
            return None;
        }
    };

    Some(Link { uri, title, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkSlot;

    const BASE: &str = "http://host.example/a/b.html";

    #[test]
    fn test_array_length_is_match_count() {
        let html = r#"
            <ul class="results">
              <li><a href="/one">One</a></li>
              <li><span>not a link</span></li>
              <li><a>no href</a></li>
              <li><a href="/four">Four</a></li>
            </ul>
        "#;
        let links = get_matching_links(html, "li > *", "", Some(BASE)).unwrap();

        assert_eq!(links.len(), 4);
        assert_eq!(links.populated_count(), 2);
        assert_eq!(links.get(0).unwrap().link().unwrap().uri, "http://host.example/one");
        assert_eq!(links.get(1), Some(&LinkSlot::Empty));
        assert_eq!(links.get(2), Some(&LinkSlot::Empty));
        assert_eq!(links.get(3).unwrap().link().unwrap().text, "Four");
    }

    #[test]
    fn test_uppercase_href_is_accepted() {
        let html = r#"<A HREF="c.html">Next page</A>"#;
        let links = get_matching_links(html, "a", "", Some(BASE)).unwrap();

        let link = links.get(0).unwrap().link().unwrap();
        assert_eq!(link.uri, "http://host.example/a/c.html");
        assert_eq!(link.text, "Next page");
    }

    #[test]
    fn test_title_is_lowercase_only() {
        let html = r#"
            <a href="/t" title="Lower">With title</a>
            <a href="/u" TITLE="Upper">Shouting title</a>
        "#;
        let links = get_matching_links(html, "a", "a.title", Some(BASE)).unwrap();

        assert_eq!(links.get(0).unwrap().link().unwrap().title.as_deref(), Some("Lower"));
        assert_eq!(links.get(1).unwrap().link().unwrap().title, None);
    }

    #[test]
    fn test_anchor_without_text_stays_empty() {
        let html = r#"<a href="/img"><img src="logo.png"/></a><a href="/t">Text</a>"#;
        let links = get_matching_links(html, "a", "", Some(BASE)).unwrap();

        assert_eq!(links.len(), 2);
        assert!(links.get(0).unwrap().is_empty());
        assert!(!links.get(1).unwrap().is_empty());
    }

    #[test]
    fn test_unresolvable_href_stays_empty() {
        let html = r#"<a href="c.html">Relative</a><a href="https://x.example/">Absolute</a>"#;
        let links = get_matching_links(html, "a", "", Some("index.html")).unwrap();

        assert!(links.get(0).unwrap().is_empty());
        assert_eq!(links.get(1).unwrap().link().unwrap().uri, "https://x.example/");
    }

    #[test]
    fn test_no_base_keeps_hrefs() {
        let html = r#"<a href="c.html">Relative</a>"#;
        let links = get_matching_links(html, "a", "", None).unwrap();
        assert_eq!(links.get(0).unwrap().link().unwrap().uri, "c.html");
    }

    #[test]
    fn test_nested_markup_in_anchor() {
        let html = r#"<div class="hit"><a href="/x">Hello  <b>World</b>  End</a></div>"#;
        let links = get_matching_links(html, "div.hit a", "", Some("http://host.example/a/b")).unwrap();

        let link = links.get(0).unwrap().link().unwrap();
        assert_eq!(link.uri, "http://host.example/x");
        assert_eq!(link.text, "Hello End");
    }

    #[test]
    fn test_misnested_anchor_keeps_its_slot() {
        let html = r#"<p><a href="/1">One</p><p>after</p><a href="/2">Two</a>"#;
        let links = get_matching_links(html, "a", "", Some("http://h.example/")).unwrap();

        // The middle match is html5ever's copy of the first anchor
        assert_eq!(links.len(), 3);
        let first = links.get(0).unwrap().link().unwrap();
        assert_eq!(first.uri, "http://h.example/1");
        assert_eq!(first.text, "One");
        assert!(links.get(1).unwrap().is_empty());
        let last = links.get(2).unwrap().link().unwrap();
        assert_eq!(last.uri, "http://h.example/2");
        assert_eq!(last.text, "Two");
    }

    #[test]
    fn test_anchor_closed_by_list_item() {
        let html = r#"<ul><li><a href="/1">One</li><li><a href="/2">Two</a></li></ul>"#;
        let links = get_matching_links(html, "a", "", Some(BASE)).unwrap();

        assert_eq!(links.populated_count(), 2);
        assert_eq!(links.get(0).unwrap().link().unwrap().text, "One");
        assert_eq!(links.get(1).unwrap().link().unwrap().text, "Two");
    }

    #[test]
    fn test_text_after_image_is_kept() {
        let html = r#"<a href="/home"><img src="logo.png"> Home</a>"#;
        let links = get_matching_links(html, "a", "", Some(BASE)).unwrap();

        let link = links.get(0).unwrap().link().unwrap();
        assert_eq!(link.uri, "http://host.example/home");
        assert_eq!(link.text, " Home");
    }

    #[test]
    fn test_whitespace_label_stays_empty() {
        let html = r#"<a href="/blank"><img src="logo.png">  </a><a href="/t">Text</a>"#;
        let links = get_matching_links(html, "a", "", Some(BASE)).unwrap();

        assert!(links.get(0).unwrap().is_empty());
        assert_eq!(links.populated_count(), 1);
    }

    #[test]
    fn test_bare_host_base_drops_root_relative_links() {
        let html = r#"<a href="/x">Root</a><a href="https://x.example/">Absolute</a>"#;
        let links = get_matching_links(html, "a", "", Some("http://host.example")).unwrap();

        assert!(links.get(0).unwrap().is_empty());
        assert_eq!(links.get(1).unwrap().link().unwrap().uri, "https://x.example/");
    }

    #[test]
    fn test_invalid_selector_gives_none() {
        assert!(get_matching_links("<a href='/x'>x</a>", "##", "", Some(BASE)).is_none());
    }

    #[test]
    fn test_no_matches_gives_empty_array() {
        let links = get_matching_links("<p>text</p>", "a", "", Some(BASE)).unwrap();
        assert!(links.is_empty());
    }
}
