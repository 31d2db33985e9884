//! Owned DOM node structure used to describe a selection.
//!
//! Callers (and the optional HTML parser) build a tree of [`Node`]s and hand it
//! to [`Fragment::from_nodes`](crate::Fragment::from_nodes), which flattens it
//! into the arena the serializer walks.

use indexmap::IndexMap;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
}

/// An owned markup node.
///
/// Element names are stored lower-cased. Attribute names are lower-cased as
/// well; a later `set_attr` with the same name replaces the earlier value.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type (element, text or comment)
    pub node_type: NodeType,

    /// Lower-cased tag name for elements, `#text` / `#comment` otherwise
    pub node_name: String,

    /// Payload for text and comment nodes
    pub node_value: Option<String>,

    /// Element attributes
    pub attributes: IndexMap<String, String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_lowercase(),
            node_value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a comment node. Comments never reach the serializer.
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            node_name: "#comment".to_string(),
            node_value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Add a child node, returning `self` for chaining
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("DIV");
        assert!(node.is_element());
        assert_eq!(node.node_name, "div");
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert!(node.is_text());
        assert_eq!(node.node_value.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_attributes() {
        let node = Node::element_with_attrs(
            "img",
            vec![("SRC", "cat.png"), ("alt", "Cat"), ("alt", "Dog")],
        );
        assert_eq!(node.attr("src"), Some("cat.png"));
        assert_eq!(node.attr("ALT"), Some("Dog"));
        assert_eq!(node.attr("title"), None);
    }

    #[test]
    fn test_with_child() {
        let p = Node::element("p")
            .with_child(Node::text("Hello "))
            .with_child(Node::element("em").with_child(Node::text("World")));
        assert_eq!(p.children.len(), 2);
        assert!(p.children[1].is_element());
    }
}
