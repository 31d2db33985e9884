//! Node classification predicates.
//!
//! All predicates are total: an absent node answers `false` (or `None`)
//! instead of failing, so callers can feed them the result of a parent or
//! sibling lookup without checking it first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fragment::MarkupNode;

static WHITESPACE_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+$").unwrap());

/// List container elements
pub const LIST_ELEMENTS: &[&str] = &["ul", "ol"];

/// Heading elements, indexed by level - 1
pub const HEADING_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Check if the node is an element
pub fn is_element(node: Option<&MarkupNode>) -> bool {
    matches!(node, Some(MarkupNode::Element(_)))
}

/// Check if the node is a text node
pub fn is_text(node: Option<&MarkupNode>) -> bool {
    matches!(node, Some(MarkupNode::Text(_)))
}

/// Lower-cased tag name of an element, `None` for text or absent nodes
pub fn element_kind(node: Option<&MarkupNode>) -> Option<&str> {
    match node {
        Some(MarkupNode::Element(element)) => Some(element.kind.as_str()),
        _ => None,
    }
}

/// Check if the node is an element of the given kind
pub fn is_element_of_kind(node: Option<&MarkupNode>, kind: &str) -> bool {
    element_kind(node).is_some_and(|k| k.eq_ignore_ascii_case(kind))
}

/// Check if the node is an element of any of the given kinds
pub fn is_element_of_any_kind(node: Option<&MarkupNode>, kinds: &[&str]) -> bool {
    element_kind(node).is_some_and(|k| kinds.iter().any(|kind| k.eq_ignore_ascii_case(kind)))
}

/// True iff the node is text made of one or more whitespace characters only
pub fn is_whitespace_only_text(node: Option<&MarkupNode>) -> bool {
    match node {
        Some(MarkupNode::Text(text)) => is_whitespace_only(&text.value),
        _ => false,
    }
}

/// True iff `s` is non-empty and every character is whitespace
pub fn is_whitespace_only(s: &str) -> bool {
    WHITESPACE_ONLY.is_match(s)
}

/// Heading level (1-6) parsed from the numeric suffix of a tag name
pub fn heading_level(kind: &str) -> Option<usize> {
    HEADING_ELEMENTS
        .iter()
        .position(|h| h.eq_ignore_ascii_case(kind))
        .map(|i| i + 1)
}

/// Check if a tag is a void element
pub fn is_void(kind: &str) -> bool {
    VOID_ELEMENTS.contains(&kind.to_lowercase().as_str())
}
