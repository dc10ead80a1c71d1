// src/dom/source.rs
// =============================================================================
// This module indexes where each element lives in the original HTML text.
//
// scraper gives us a DOM and CSS selector matching, but its nodes don't
// remember where they came from in the source. The inner-text scan needs
// exactly that, so we make one cheap pass over the raw bytes and record
// every start tag in document order:
// - the tag name and attributes exactly as written (case preserved)
// - the byte offset of the '<'
// - the length of the opening tag text
// - the length of the whole element, up to the end of its closing tag
//
// It's not an HTML parser. Comments, doctypes and raw-text elements
// (script, style, ...) are skipped so their contents don't produce
// phantom elements, and closing tags pop back to the nearest open element
// with the same name. Elements popped on the way end at that same closing
// tag, the way `</li>` ends an `<a>` that was never closed. Everything
// else is taken at face value.
// =============================================================================

use std::collections::HashMap;

// Elements that never have content or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

// Elements whose content is raw text, not markup
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "textarea", "title", "noscript", "iframe", "xmp", "noembed", "noframes",
];

/// Byte position of an element within the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    /// Offset of the opening '<'
    pub offset: usize,
    /// Length of the full markup, up to the end of the closing tag that
    /// ended the element (its own, or an ancestor's). Equal to `tag_len`
    /// when the element was never closed.
    pub length: usize,
    /// Length of the opening tag text
    pub tag_len: usize,
}

impl SourceSpan {
    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// The opening tag text, e.g. `<a href="/x">`
    pub fn opening_tag<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.offset..self.offset + self.tag_len)
            .unwrap_or_default()
    }

    /// The complete markup of the element
    pub fn markup<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.offset..self.end()).unwrap_or_default()
    }

    /// Whether some closing tag ended the element
    pub fn is_closed(&self) -> bool {
        self.length > self.tag_len
    }
}

/// One start tag found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub span: SourceSpan,
}

/// All elements of a document in source order, grouped by lowercase name
#[derive(Debug, Default)]
pub struct SourceIndex {
    elements: Vec<SourceElement>,
    by_name: HashMap<String, Vec<usize>>,
}

impl SourceIndex {
    // Scans the source once and records every element
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut elements: Vec<SourceElement> = Vec::new();
        // Indices (into `elements`) of elements still waiting for a closing tag
        let mut open: Vec<usize> = Vec::new();
        let mut pos = 0;

        while let Some(lt) = find_byte(bytes, pos, b'<') {
            match bytes.get(lt + 1) {
                Some(b'!') => {
                    pos = if bytes[lt..].starts_with(b"<!--") {
                        find_seq(bytes, lt + 4, b"-->").map_or(bytes.len(), |i| i + 3)
                    } else {
                        skip_past(bytes, lt, b'>')
                    };
                }
                Some(b'?') => pos = skip_past(bytes, lt, b'>'),
                Some(b'/') => {
                    let (name, name_end) = read_name(bytes, lt + 2);
                    let close_end = skip_past(bytes, name_end, b'>');
                    if !name.is_empty() {
                        close_element(&mut elements, &mut open, &name, close_end);
                    }
                    pos = close_end;
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    let (name, name_end) = read_name(bytes, lt + 1);
                    let (attributes, tag_end, self_closing) = read_attributes(bytes, name_end);
                    let lower = name.to_ascii_lowercase();
                    let tag_len = tag_end - lt;

                    elements.push(SourceElement {
                        name,
                        attributes,
                        span: SourceSpan {
                            offset: lt,
                            length: tag_len,
                            tag_len,
                        },
                    });
                    let index = elements.len() - 1;
                    pos = tag_end;

                    if self_closing || is_void_element(lower.as_bytes()) {
                        continue;
                    }

                    if RAW_TEXT_ELEMENTS.contains(&lower.as_str()) {
                        // Jump straight to the closing tag, the content is opaque
                        pos = match find_close_tag(bytes, tag_end, &lower) {
                            Some(close_start) => {
                                let close_end = skip_past(bytes, close_start, b'>');
                                elements[index].span.length = close_end - lt;
                                close_end
                            }
                            None => bytes.len(),
                        };
                        continue;
                    }

                    open.push(index);
                }
                // A bare '<' in text
                _ => pos = lt + 1,
            }
        }

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, element) in elements.iter().enumerate() {
            by_name
                .entry(element.name.to_ascii_lowercase())
                .or_default()
                .push(index);
        }

        SourceIndex { elements, by_name }
    }

    /// Every element named `name` (ignoring case), in source order
    pub fn named(&self, name: &str) -> Vec<&SourceElement> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(|positions| positions.iter().map(|&index| &self.elements[index]).collect())
            .unwrap_or_default()
    }
}

// Whether a tag name (any case) is one that never has content
pub(crate) fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.as_bytes().eq_ignore_ascii_case(name))
}

// Whitespace as the C locale defines it (includes vertical tab)
pub(crate) fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| i + from)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

// Position just after the next `needle`, or the end of input
fn skip_past(bytes: &[u8], from: usize, needle: u8) -> usize {
    find_byte(bytes, from, needle).map_or(bytes.len(), |i| i + 1)
}

fn read_name(bytes: &[u8], start: usize) -> (String, usize) {
    let mut end = start;
    while end < bytes.len() && !is_space(bytes[end]) && bytes[end] != b'/' && bytes[end] != b'>' {
        end += 1;
    }
    let name = bytes
        .get(start..end)
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .unwrap_or_default();
    (name, end)
}

// Reads attributes up to and including the '>' that ends the tag
//
// Returns: (attributes, offset just past the tag, whether it ended in "/>")
// Quoted values may contain '>' without ending the tag. Only the first
// occurrence of a repeated attribute is kept.
fn read_attributes(bytes: &[u8], start: usize) -> (Vec<(String, String)>, usize, bool) {
    let len = bytes.len();
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut pos = start;
    let mut self_closing = false;

    loop {
        while pos < len && is_space(bytes[pos]) {
            pos += 1;
        }
        if pos >= len {
            return (attributes, len, false);
        }
        match bytes[pos] {
            b'>' => return (attributes, pos + 1, self_closing),
            b'/' => {
                self_closing = true;
                pos += 1;
                continue;
            }
            _ => self_closing = false,
        }

        let name_start = pos;
        while pos < len && !is_space(bytes[pos]) && !matches!(bytes[pos], b'=' | b'>' | b'/') {
            pos += 1;
        }
        let name = String::from_utf8_lossy(&bytes[name_start..pos]).into_owned();

        while pos < len && is_space(bytes[pos]) {
            pos += 1;
        }

        let mut value = String::new();
        if pos < len && bytes[pos] == b'=' {
            pos += 1;
            while pos < len && is_space(bytes[pos]) {
                pos += 1;
            }
            if pos < len && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote = bytes[pos];
                let value_start = pos + 1;
                let value_end = find_byte(bytes, value_start, quote).unwrap_or(len);
                value = String::from_utf8_lossy(&bytes[value_start..value_end]).into_owned();
                pos = (value_end + 1).min(len);
            } else {
                let value_start = pos;
                while pos < len && !is_space(bytes[pos]) && bytes[pos] != b'>' {
                    pos += 1;
                }
                value = String::from_utf8_lossy(&bytes[value_start..pos]).into_owned();
            }
        }

        if !name.is_empty() && !attributes.iter().any(|(existing, _)| *existing == name) {
            attributes.push((name, value));
        }
    }
}

// Finds the start of `</name` (any case) at or after `from`
fn find_close_tag(bytes: &[u8], from: usize, lower_name: &str) -> Option<usize> {
    let name = lower_name.as_bytes();
    let mut pos = from;

    while let Some(lt) = find_seq(bytes, pos, b"</") {
        let name_start = lt + 2;
        let name_end = name_start + name.len();
        if let Some(candidate) = bytes.get(name_start..name_end) {
            let terminated = bytes
                .get(name_end)
                .map_or(true, |&b| is_space(b) || b == b'>' || b == b'/');
            if candidate.eq_ignore_ascii_case(name) && terminated {
                return Some(lt);
            }
        }
        pos = lt + 2;
    }

    None
}

// Closes the nearest open element called `name`, along with everything
// opened after it. All of them end at `close_end`.
fn close_element(elements: &mut [SourceElement], open: &mut Vec<usize>, name: &str, close_end: usize) {
    let depth = open
        .iter()
        .rposition(|&index| elements[index].name.eq_ignore_ascii_case(name));

    if let Some(depth) = depth {
        for &index in &open[depth..] {
            let span = &mut elements[index].span;
            span.length = close_end - span.offset;
        }
        open.truncate(depth);
    }
}
