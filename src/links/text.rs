// src/links/text.rs
// =============================================================================
// This module pulls the visible text out of an element.
//
// It works on the original HTML bytes, between the end of the element's
// opening tag and the start of its closing tag:
//
//   <a href="/docs">  Read the <b>new</b>   docs  </a>
//                   ^------------------------------^
//
// Rules:
// - leading whitespace is dropped
// - every run of whitespace becomes a single space (a trailing run too),
//   also inside child elements
// - markup is found by bare '<' and '>' bytes, nothing smarter, and is
//   never copied
// - text inside child elements is left out unless asked for; void
//   children like <br> and <img> hold no text and don't nest
// - a result that is only whitespace counts as no text
//
// The '<'/'>' counting is a heuristic. A literal '>' inside an attribute
// value, or an unclosed child like <p> or <li>, will throw it off.
// =============================================================================

use crate::dom::{is_space, is_void_element, Node};

// Extracts the visible text of a node
//
// Parameters:
//   node: the element (must carry a source span to produce anything)
//   source: the full HTML the node was found in
//   include_child_text: also keep text that sits inside child elements
//
// Returns: Some(text), or None when the element has no content, never
//          closes, or only contains markup
//
// Example:
//   <a href="/x">Hello  <b>World</b>  End</a>
//   include_child_text = false -> Some("Hello End")
//   include_child_text = true  -> Some("Hello World End")
//
//   <a href="/home"><img src="logo.png"> Home</a>  -> Some(" Home")
pub fn inner_text(node: &Node, source: &str, include_child_text: bool) -> Option<String> {
    let span = node.span()?;
    let bytes = source.as_bytes();

    let mut start = span.offset + span.tag_len;
    if start >= bytes.len() {
        return None;
    }

    // Walk back from the last byte of the element to the '<' that opens
    // its closing tag
    let mut end = (span.end().checked_sub(1)?).min(bytes.len() - 1);
    while bytes[end] != b'<' && start < end {
        end -= 1;
    }
    if bytes[end] != b'<' || end < start {
        return None;
    }

    if bytes[start] == b'>' {
        start += 1;
    }
    while start < end && is_space(bytes[start]) {
        start += 1;
    }

    let content = &bytes[start.min(end)..end];
    let text = collapse(content, include_child_text);

    if text.iter().all(|&c| c == b' ') {
        None
    } else {
        Some(String::from_utf8_lossy(&text).into_owned())
    }
}

// Copies `content`, squeezing whitespace runs and dropping markup
fn collapse(content: &[u8], include_child_text: bool) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(content.len());
    // The last byte written was a space
    let mut space_flag = false;
    // Inside a '<' ... '>' pair
    let mut in_markup = false;
    let mut markup_start = 0;
    // How many child elements we're inside
    let mut child_depth: usize = 0;

    for (i, &c) in content.iter().enumerate() {
        match c {
            b'<' => {
                in_markup = true;
                markup_start = i;
            }
            b'>' => {
                if in_markup {
                    in_markup = false;
                    let tag = &content[markup_start + 1..i];
                    match tag.first() {
                        Some(b'/') => child_depth = child_depth.saturating_sub(1),
                        Some(b'!') | Some(b'?') => {}
                        _ if tag.ends_with(b"/") || is_void_element(tag_name(tag)) => {}
                        _ => child_depth += 1,
                    }
                }
            }
            _ if in_markup => {}
            _ if is_space(c) => {
                if !space_flag {
                    buffer.push(b' ');
                    space_flag = true;
                }
            }
            _ => {
                if include_child_text || child_depth == 0 {
                    buffer.push(c);
                    space_flag = false;
                }
            }
        }
    }

    buffer
}

// The element name at the start of a tag's text, e.g. "img" in `img src=x`
fn tag_name(tag: &[u8]) -> &[u8] {
    let end = tag
        .iter()
        .position(|&c| is_space(c) || c == b'/')
        .unwrap_or(tag.len());
    &tag[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::select_nodes;

    // Runs the extractor on the first <a> in `html`
    fn anchor_text(html: &str, include_child_text: bool) -> Option<String> {
        let nodes = select_nodes(html, "a").unwrap();
        inner_text(&nodes[0], html, include_child_text)
    }

    #[test]
    fn test_plain_text() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        assert_eq!(anchor_text(html, false), Some("Rust".to_string()));
    }

    #[test]
    fn test_child_text_is_dropped() {
        let html = r#"<a href="/x">Hello  <b>World</b>  End</a>"#;
        assert_eq!(anchor_text(html, false), Some("Hello End".to_string()));
    }

    #[test]
    fn test_child_text_can_be_included() {
        let html = r#"<a href="/x">Hello  <b>World</b>  End</a>"#;
        assert_eq!(anchor_text(html, true), Some("Hello World End".to_string()));
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let html = "<a href=\"/x\">\n    Rust\t\tlang\n  book</a>";
        assert_eq!(anchor_text(html, false), Some("Rust lang book".to_string()));
    }

    #[test]
    fn test_trailing_whitespace_leaves_one_space() {
        let html = "<a href=\"/x\">  Docs  \n</a>";
        assert_eq!(anchor_text(html, false), Some("Docs ".to_string()));
    }

    #[test]
    fn test_entities_are_kept_verbatim() {
        let html = r#"<a href="/x">Fish&nbsp;&amp;&nbsp;Chips</a>"#;
        assert_eq!(anchor_text(html, false), Some("Fish&nbsp;&amp;&nbsp;Chips".to_string()));
    }

    #[test]
    fn test_self_closing_child_does_not_nest() {
        let html = r#"<a href="/x">Line<br/>Next</a>"#;
        assert_eq!(anchor_text(html, false), Some("LineNext".to_string()));
    }

    #[test]
    fn test_empty_element_gives_nothing() {
        assert_eq!(anchor_text(r#"<a href="/x"></a>"#, false), None);
        assert_eq!(anchor_text("<a href=\"/x\">   </a>", false), None);
    }

    #[test]
    fn test_only_child_markup_gives_nothing() {
        let html = r#"<a href="/x"><span>hidden</span></a>"#;
        assert_eq!(anchor_text(html, false), None);
    }

    #[test]
    fn test_unclosed_element_gives_nothing() {
        let html = r#"<div><a href="/x"/></div>"#;
        assert_eq!(anchor_text(html, false), None);
    }

    #[test]
    fn test_element_at_end_of_input_gives_nothing() {
        let html = r#"<a href="/x">"#;
        assert_eq!(anchor_text(html, false), None);
    }

    #[test]
    fn test_text_after_void_child_is_kept() {
        let html = r#"<a href="/home"><img src="logo.png"> Home</a>"#;
        assert_eq!(anchor_text(html, false), Some(" Home".to_string()));

        let html = r#"<a href="/x">Line<br>Next</a>"#;
        assert_eq!(anchor_text(html, false), Some("LineNext".to_string()));

        let html = r#"<a href="/x">Name <INPUT type="checkbox"> and <b>bold</b> more</a>"#;
        assert_eq!(anchor_text(html, false), Some("Name and more".to_string()));
    }

    #[test]
    fn test_whitespace_only_text_gives_nothing() {
        let html = r#"<a href="/x"><img src="logo.png">   </a>"#;
        assert_eq!(anchor_text(html, false), None);

        let html = r#"<a href="/x"><span> </span> <hr> </a>"#;
        assert_eq!(anchor_text(html, false), None);
    }

    #[test]
    fn test_anchor_closed_by_parent() {
        let html = r#"<ul><li><a href="/1">One</li><li><a href="/2">Two</a></li></ul>"#;
        assert_eq!(anchor_text(html, false), Some("One".to_string()));
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name(b"img src=x"), b"img");
        assert_eq!(tag_name(b"br/"), b"br");
        assert_eq!(tag_name(b"hr"), b"hr");
    }

    #[test]
    fn test_image_only_anchor_gives_nothing() {
        let html = r#"<a href="/x"><img src="logo.png" alt="Logo"></a>"#;
        assert_eq!(anchor_text(html, false), None);
    }

    #[test]
    fn test_node_without_span_gives_nothing() {
        let node = Node::new("a", Default::default(), None);
        assert_eq!(inner_text(&node, "<a>text</a>", false), None);
    }

    #[test]
    fn test_multibyte_text_survives() {
        let html = r#"<a href="/x">Café  «menu»</a>"#;
        assert_eq!(anchor_text(html, false), Some("Café «menu»".to_string()));
    }
}
