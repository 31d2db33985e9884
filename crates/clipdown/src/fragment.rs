//! Arena representation of a selected fragment.
//!
//! A [`Fragment`] owns every node of a selection in a flat vector. Children are
//! stored as index lists and each node records the index of its parent, so
//! ancestor lookups never need owning back-pointers.

use indexmap::IndexMap;

use crate::classify;
use crate::node::{Node, NodeType};

/// Index of a node inside its [`Fragment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena (document order)
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lower-cased tag name
    pub kind: String,
    /// Attribute name (lower-cased) to value
    pub attributes: IndexMap<String, String>,
    /// Child nodes in document order
    pub children: Vec<NodeId>,
    /// Enclosing element, `None` at the fragment root level
    pub parent: Option<NodeId>,
}

/// A text run in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Raw character payload
    pub value: String,
    /// Enclosing element, `None` at the fragment root level
    pub parent: Option<NodeId>,
}

/// A node of the fragment: either an element or a text run
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(Element),
    Text(Text),
}

impl MarkupNode {
    /// Parent index of this node
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            MarkupNode::Element(element) => element.parent,
            MarkupNode::Text(text) => text.parent,
        }
    }

    /// Child indices (always empty for text)
    pub fn children(&self) -> &[NodeId] {
        match self {
            MarkupNode::Element(element) => &element.children,
            MarkupNode::Text(_) => &[],
        }
    }
}

/// The cloned subtree of a selection.
///
/// Nodes are pushed in pre-order, so `NodeId` order equals document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<MarkupNode>,
    roots: Vec<NodeId>,
}

impl Fragment {
    /// Create an empty fragment (a collapsed selection)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fragment from root-level nodes. Comment nodes are dropped.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut fragment = Self::new();
        for node in nodes {
            if let Some(id) = fragment.push(node, None) {
                fragment.roots.push(id);
            }
        }
        fragment
    }

    /// Build a fragment with a single root node
    pub fn from_node(node: Node) -> Self {
        Self::from_nodes(vec![node])
    }

    fn push(&mut self, node: Node, parent: Option<NodeId>) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        match node.node_type {
            NodeType::Comment => return None,
            NodeType::Text => {
                self.nodes.push(MarkupNode::Text(Text {
                    value: node.node_value.unwrap_or_default(),
                    parent,
                }));
            }
            NodeType::Element => {
                self.nodes.push(MarkupNode::Element(Element {
                    kind: node.node_name.to_lowercase(),
                    attributes: node.attributes,
                    children: Vec::new(),
                    parent,
                }));
                let mut children = Vec::with_capacity(node.children.len());
                for child in node.children {
                    if let Some(child_id) = self.push(child, Some(id)) {
                        children.push(child_id);
                    }
                }
                if let MarkupNode::Element(element) = &mut self.nodes[id.0] {
                    element.children = children;
                }
            }
        }
        Some(id)
    }

    /// Check if the fragment has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of element and text nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Root-level nodes in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&MarkupNode> {
        self.nodes.get(id.0)
    }

    /// A navigable view of a node
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { fragment: self, id }
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(MarkupNode::parent)
    }

    /// Children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(MarkupNode::children).unwrap_or(&[])
    }

    /// The sibling list a node belongs to (its parent's children or the roots)
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    /// The node following `id` in its sibling list
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(id);
        let position = siblings.iter().position(|&s| s == id)?;
        siblings.get(position + 1).copied()
    }
}

/// A node together with the fragment it lives in.
///
/// This is what formatting rules receive: it answers classifier questions and
/// walks up (ancestors), sideways (siblings) and down (children).
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    fragment: &'a Fragment,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Arena index of the node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The fragment this node belongs to
    pub fn fragment(&self) -> &'a Fragment {
        self.fragment
    }

    /// The underlying arena node
    pub fn markup(&self) -> Option<&'a MarkupNode> {
        self.fragment.get(self.id)
    }

    pub fn is_element(&self) -> bool {
        classify::is_element(self.markup())
    }

    pub fn is_text(&self) -> bool {
        classify::is_text(self.markup())
    }

    pub fn is_whitespace_only_text(&self) -> bool {
        classify::is_whitespace_only_text(self.markup())
    }

    /// Lower-cased tag name, `None` for text nodes
    pub fn tag_name(&self) -> Option<&'a str> {
        classify::element_kind(self.markup())
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        classify::is_element_of_kind(self.markup(), kind)
    }

    pub fn is_any_kind(&self, kinds: &[&str]) -> bool {
        classify::is_element_of_any_kind(self.markup(), kinds)
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        match self.markup()? {
            MarkupNode::Element(element) => element
                .attributes
                .get(&name.to_lowercase())
                .map(String::as_str),
            MarkupNode::Text(_) => None,
        }
    }

    /// Text payload of a text node
    pub fn text(&self) -> Option<&'a str> {
        match self.markup()? {
            MarkupNode::Text(text) => Some(text.value.as_str()),
            MarkupNode::Element(_) => None,
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.fragment.parent(self.id).map(|id| self.fragment.node(id))
    }

    /// Ancestors from the parent up to the fragment root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> {
        let fragment = self.fragment;
        std::iter::successors(self.parent(), move |n| {
            fragment.parent(n.id).map(|id| fragment.node(id))
        })
    }

    /// Nearest ancestor of one of the given kinds
    pub fn closest(&self, kinds: &[&str]) -> Option<NodeRef<'a>> {
        self.ancestors().find(|a| a.is_any_kind(kinds))
    }

    pub fn has_ancestor(&self, kinds: &[&str]) -> bool {
        self.closest(kinds).is_some()
    }

    /// Number of ancestors of the given kinds
    pub fn count_ancestors(&self, kinds: &[&str]) -> usize {
        self.ancestors().filter(|a| a.is_any_kind(kinds)).count()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> {
        let fragment = self.fragment;
        fragment.children(self.id).iter().map(move |&id| fragment.node(id))
    }

    pub fn element_children(&self) -> impl Iterator<Item = NodeRef<'a>> {
        self.children().filter(|c| c.is_element())
    }

    fn siblings(&self) -> &'a [NodeId] {
        self.fragment.siblings(self.id)
    }

    fn sibling_position(&self) -> usize {
        self.siblings()
            .iter()
            .position(|&s| s == self.id)
            .unwrap_or(0)
    }

    pub fn is_first_child(&self) -> bool {
        self.siblings().first() == Some(&self.id)
    }

    pub fn is_last_child(&self) -> bool {
        self.siblings().last() == Some(&self.id)
    }

    /// Closest preceding sibling that is an element
    pub fn previous_element_sibling(&self) -> Option<NodeRef<'a>> {
        let siblings = self.siblings();
        siblings[..self.sibling_position()]
            .iter()
            .rev()
            .map(|&id| self.fragment.node(id))
            .find(|n| n.is_element())
    }

    /// True when no element sibling precedes this node
    pub fn is_first_element_child(&self) -> bool {
        self.previous_element_sibling().is_none()
    }

    /// 1-based index among the siblings of the same element kind
    pub fn position_among_kind(&self) -> usize {
        let Some(kind) = self.tag_name() else {
            return 0;
        };
        self.siblings()[..=self.sibling_position()]
            .iter()
            .filter(|&&id| self.fragment.node(id).is_kind(kind))
            .count()
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.markup() {
            Some(MarkupNode::Text(text)) => out.push_str(&text.value),
            Some(MarkupNode::Element(_)) => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
            None => {}
        }
    }

    /// Reconstruct outer HTML (for keep rules)
    pub fn outer_html(&self) -> String {
        match self.markup() {
            Some(MarkupNode::Text(text)) => escape_html_text(&text.value),
            Some(MarkupNode::Element(element)) => {
                let tag = &element.kind;
                let attrs = attributes_string(&element.attributes);
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if classify::is_void(tag) {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
            None => String::new(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(|child| child.outer_html()).collect()
    }
}

/// Get attributes as a string for HTML output
fn attributes_string(attrs: &IndexMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(name, value)| {
            if value.is_empty() {
                name.clone()
            } else {
                format!("{}=\"{}\"", name, escape_html_attr(value))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    escape_html_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Fragment {
        let ol = Node::element("ol")
            .with_child(Node::text("\n  "))
            .with_child(Node::element("li").with_child(Node::text("One")))
            .with_child(Node::comment("skipped"))
            .with_child(Node::element("div"))
            .with_child(Node::element("li").with_child(Node::text("Two")));
        Fragment::from_node(ol)
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = Fragment::new();
        assert!(fragment.is_empty());
        assert_eq!(fragment.len(), 0);
        assert!(fragment.roots().is_empty());
    }

    #[test]
    fn test_comments_dropped() {
        let fragment = list();
        let ol = fragment.roots()[0];
        // text, li, div, li
        assert_eq!(fragment.children(ol).len(), 4);
        assert_eq!(fragment.len(), 7);
    }

    #[test]
    fn test_parent_indices_match_children() {
        let fragment = list();
        let ol = fragment.roots()[0];
        for &child in fragment.children(ol) {
            assert_eq!(fragment.parent(child), Some(ol));
        }
        assert_eq!(fragment.parent(ol), None);
    }

    #[test]
    fn test_sibling_navigation() {
        let fragment = list();
        let ol = fragment.roots()[0];
        let children = fragment.children(ol).to_vec();
        assert_eq!(fragment.next_sibling(children[0]), Some(children[1]));
        assert_eq!(fragment.next_sibling(children[3]), None);

        let first_li = fragment.node(children[1]);
        assert!(first_li.is_first_element_child());
        assert!(!first_li.is_first_child());

        let second_li = fragment.node(children[3]);
        assert_eq!(second_li.previous_element_sibling().and_then(|n| n.tag_name()), Some("div"));
        assert!(second_li.is_last_child());
        assert_eq!(second_li.position_among_kind(), 2);
    }

    #[test]
    fn test_ancestors() {
        let deep = Node::element("ul").with_child(
            Node::element("li").with_child(
                Node::element("ul").with_child(Node::element("li").with_child(Node::text("x"))),
            ),
        );
        let fragment = Fragment::from_node(deep);
        let text = fragment.node(NodeId(4));
        assert_eq!(text.text(), Some("x"));
        assert_eq!(text.count_ancestors(&["ul", "ol"]), 2);
        assert_eq!(text.closest(&["li"]).map(|n| n.id()), Some(NodeId(3)));
        assert!(!text.has_ancestor(&["pre"]));
    }

    #[test]
    fn test_text_content() {
        let div = Node::element("div")
            .with_child(Node::text("Hello "))
            .with_child(Node::element("span").with_child(Node::text("World")));
        let fragment = Fragment::from_node(div);
        assert_eq!(fragment.node(fragment.roots()[0]).text_content(), "Hello World");
    }

    #[test]
    fn test_outer_html() {
        let a = Node::element_with_attrs("a", vec![("href", "https://example.com/?a=1&b=\"2\"")])
            .with_child(Node::text("<Link>"));
        let fragment = Fragment::from_nodes(vec![a, Node::element("br")]);
        assert_eq!(
            fragment.node(fragment.roots()[0]).outer_html(),
            "<a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\">&lt;Link&gt;</a>"
        );
        assert_eq!(fragment.node(fragment.roots()[1]).outer_html(), "<br>");
    }
}
