//! HTML parsing support.
//!
//! Turns an HTML snippet (for example the serialized contents of a selection
//! range) into a [`Fragment`].

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::fragment::Fragment;
use crate::node::Node;

/// Parse an HTML snippet into a Fragment.
///
/// # Example
///
/// ```rust
/// use clipdown::{parse_html, ClipdownService};
///
/// let fragment = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = ClipdownService::new().serialize(&fragment);
/// assert_eq!(markdown, "# Hello _World_");
/// ```
pub fn parse_html(html: &str) -> Fragment {
    let document = Html::parse_fragment(html);
    // parse_fragment wraps the snippet in a synthetic <html> root
    Fragment::from_nodes(children_of(document.root_element()))
}

fn children_of(element: ElementRef) -> Vec<Node> {
    let mut children = Vec::new();

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => children.push(Node::text(&text.text)),
            ScraperNode::Comment(comment) => children.push(Node::comment(&comment.comment)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    children.push(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    children
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = Node::element_with_attrs(tag, attrs);
    for child in children_of(element) {
        node.add_child(child);
    }
    node
}
