// src/dom/select.rs
// =============================================================================
// This module runs a CSS selector over an HTML document.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// scraper decides WHICH elements match. The source index (source.rs)
// tells us WHERE each of them is in the original text. The two are paired
// up in order, per tag name: each element html5ever created is matched
// with the next unused start tag of that name whose attributes and text
// agree with it. Elements html5ever made up itself (<tbody>, or the
// copies of <a>, <b>, ... it makes when repairing misnested markup) find
// no such tag and stay unpaired.
// =============================================================================

use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef};
use log::debug;
use scraper::node::Element;
use scraper::{Html, Selector};

use super::source::{SourceElement, SourceIndex};
use super::Node;
use crate::error::ExtractError;

// How many start tags ahead of the expected one an element may pair with,
// for tags html5ever dropped (a stray <tr>, a second <body>, ...)
const PAIRING_WINDOW: usize = 4;

// Selects the nodes matching a CSS selector
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   selector: a CSS selector, e.g. "div.results a"
//
// Returns: the matched nodes in document order, or
//          ExtractError::InvalidSelector if the selector doesn't parse
//
// Example:
//   html = "<p><a href='/docs'>Docs</a></p>"
//   selector = "p a"
//   result = [Node { tag_name: "a", attributes: {href: "/docs"}, .. }]
pub fn select_nodes(html: &str, selector: &str) -> Result<Vec<Node>, ExtractError> {
    // Parse the selector first, a bad one means there is nothing to do
    let parsed = Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let index = SourceIndex::build(html);
    let paired = pair_with_source(&document, &index, html);

    let nodes: Vec<Node> = document
        .select(&parsed)
        .map(|element| {
            let name = element.value().name();

            match paired.get(&element.id()) {
                Some(source_element) => Node::from_source(source_element),
                None => {
                    // html5ever made this element up, so there is no markup
                    // to point at
                    debug!("No source markup for <{}>", name);
                    let attributes = element
                        .value()
                        .attrs()
                        .map(|(key, value)| (key.to_string(), value.to_string()))
                        .collect();
                    Node::new(name, attributes, None)
                }
            }
        })
        .collect();

    debug!("Selector '{}' matched {} node(s)", selector, nodes.len());

    Ok(nodes)
}

// Pairs the elements of the parsed tree with their start tags
//
// The tree stores nodes in creation order, which follows the start tags in
// the source even when html5ever later moves a node elsewhere. So walking
// it once, with one cursor per tag name into the source index, lines the
// two up. An element that agrees with none of the next few tags is one
// html5ever created itself and doesn't move the cursor.
fn pair_with_source<'a>(
    document: &Html,
    index: &'a SourceIndex,
    source: &str,
) -> HashMap<NodeId, &'a SourceElement> {
    let mut queues: HashMap<String, (Vec<&'a SourceElement>, usize)> = HashMap::new();
    let mut paired = HashMap::new();

    for node in document.tree.nodes() {
        let Some(element) = node.value().as_element() else {
            continue;
        };

        let name = element.name().to_ascii_lowercase();
        let (candidates, cursor) = queues
            .entry(name)
            .or_insert_with_key(|name| (index.named(name), 0));

        let found = candidates
            .iter()
            .skip(*cursor)
            .take(PAIRING_WINDOW)
            .position(|candidate| fits(node, candidate, source));

        let Some(skipped) = found else {
            debug!("<{}> has no start tag of its own", element.name());
            continue;
        };

        let at = *cursor + skipped;
        if yields_to_inner(node, candidates, at, source) {
            debug!("<{}> wraps the element its start tag belongs to", element.name());
            continue;
        }

        paired.insert(node.id(), candidates[at]);
        *cursor = at + 1;
    }

    paired
}

// Whether a tree element could have come from a start tag
fn fits(node: NodeRef<'_, scraper::Node>, candidate: &SourceElement, source: &str) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| same_attributes(element, candidate) && text_fits(node, candidate, source))
}

// Whether the start tag at `at` belongs to an element nested in `node`
//
// Rebuilding a formatting element (<b>, <i>, ...) right before a real one
// of the same kind puts the real one inside the copy, so the copy sees the
// real one's text. The inner element keeps the tag when it fits it and
// nothing after it.
fn yields_to_inner(
    node: NodeRef<'_, scraper::Node>,
    candidates: &[&SourceElement],
    at: usize,
    source: &str,
) -> bool {
    let Some(element) = node.value().as_element() else {
        return false;
    };

    let inner = node.descendants().skip(1).find(|descendant| {
        descendant
            .value()
            .as_element()
            .is_some_and(|nested| nested.name() == element.name())
    });

    match inner {
        Some(inner) => {
            fits(inner, candidates[at], source)
                && !candidates
                    .get(at + 1)
                    .is_some_and(|next| fits(inner, next, source))
        }
        None => false,
    }
}

// Whether an element carries the attributes written in a start tag
//
// html5ever decodes entities and line endings in values, so raw values
// holding '&' or '\r' are taken on trust.
fn same_attributes(element: &Element, candidate: &SourceElement) -> bool {
    if element.attrs().count() != candidate.attributes.len() {
        return false;
    }

    element.attrs().all(|(name, value)| {
        candidate.attributes.iter().any(|(raw_name, raw_value)| {
            let name_matches = raw_name.eq_ignore_ascii_case(name)
                || raw_name
                    .rsplit_once(':')
                    .is_some_and(|(_, local)| local.eq_ignore_ascii_case(name));
            name_matches && (raw_value == value || raw_value.contains(|c: char| c == '&' || c == '\r'))
        })
    })
}

// Whether the element's first word of text sits inside the start tag's
// element in the source
//
// Copies made by html5ever hold text that comes before the next real
// start tag, so their words are not found after it.
fn text_fits(node: NodeRef<'_, scraper::Node>, candidate: &SourceElement, source: &str) -> bool {
    let word = node.descendants().find_map(|descendant| {
        descendant.value().as_text().and_then(|text| {
            let word: String = text
                .split_whitespace()
                .next()?
                .chars()
                .take_while(char::is_ascii_alphanumeric)
                .collect();
            Some(word)
        })
    });

    // No text, or text that entities may have produced: nothing to check
    let Some(word) = word.filter(|word| !word.is_empty()) else {
        return true;
    };

    let span = candidate.span;
    let end = if span.is_closed() { span.end() } else { source.len() };
    source
        .get(span.offset..end)
        .is_some_and(|markup| markup.contains(word.as_str()))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just use scraper's element.html()?
//    - html() re-serializes the element from the tree
//    - Whitespace, attribute quoting and entity spelling can all change
//    - The inner-text scan works on the exact bytes the page was sent with
//
// 2. What is map_err?
//    - It converts the error inside a Result into another error type
//    - Here scraper's selector error becomes our ExtractError
//    - The ? then returns early if the selector was invalid
//
// 3. Why pair elements per tag name?
//    - html5ever may add elements that aren't in the source (<html>,
//      <body>, <tbody>), which would throw off a single global count
//    - Keeping one cursor per name keeps <a> elements lined up even then
//
// 4. What is `let ... else`?
//    - `let Some(x) = value else { continue; };` binds x or leaves the
//      current iteration, without another level of nesting
// -----------------------------------------------------------------------------
