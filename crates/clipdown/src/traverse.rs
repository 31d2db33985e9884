//! Pre-order traversal of a [`Fragment`].

use crate::fragment::{Fragment, NodeId};

/// What the walker should do after an element has been formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    /// Visit the element's children next
    #[default]
    Descend,
    /// The element consumed its own content; resume at its next sibling
    SkipChildren,
}

/// A restartable cursor over the nodes of a fragment in document order.
///
/// `next_node` descends into children; `next_sibling` skips the current
/// node's descendants. Both ascend when a subtree is exhausted and return
/// `None` once the last root has been left.
#[derive(Debug, Clone)]
pub struct Walker<'a> {
    fragment: &'a Fragment,
    current: Option<NodeId>,
    started: bool,
}

impl<'a> Walker<'a> {
    pub fn new(fragment: &'a Fragment) -> Self {
        Self {
            fragment,
            current: None,
            started: false,
        }
    }

    /// Rewind to before the first node
    pub fn reset(&mut self) {
        self.current = None;
        self.started = false;
    }

    /// The node returned by the last advance
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Pre-order step: first child if any, otherwise the next node after the
    /// current subtree
    pub fn next_node(&mut self) -> Option<NodeId> {
        let next = match self.current {
            None if !self.started => self.fragment.roots().first().copied(),
            None => None,
            Some(id) => match self.fragment.children(id).first() {
                Some(&child) => Some(child),
                None => self.following(id),
            },
        };
        self.step(next)
    }

    /// Skip the current node's descendants
    pub fn next_sibling(&mut self) -> Option<NodeId> {
        let next = match self.current {
            None if !self.started => self.fragment.roots().first().copied(),
            None => None,
            Some(id) => self.following(id),
        };
        self.step(next)
    }

    /// Advance according to a formatting directive
    pub fn advance(&mut self, directive: Directive) -> Option<NodeId> {
        match directive {
            Directive::Descend => self.next_node(),
            Directive::SkipChildren => self.next_sibling(),
        }
    }

    fn step(&mut self, next: Option<NodeId>) -> Option<NodeId> {
        self.started = true;
        self.current = next;
        log::trace!("walker at {:?}", next);
        next
    }

    /// Next sibling of `id`, or of its nearest ancestor that has one
    fn following(&self, id: NodeId) -> Option<NodeId> {
        let mut node = id;
        loop {
            if let Some(sibling) = self.fragment.next_sibling(node) {
                return Some(sibling);
            }
            node = self.fragment.parent(node)?;
        }
    }
}

impl Iterator for Walker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.next_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    fn tree() -> Fragment {
        // <p>a<b>b</b></p><ul><li>c</li></ul>d
        Fragment::from_nodes(vec![
            Node::element("p")
                .with_child(Node::text("a"))
                .with_child(Node::element("b").with_child(Node::text("b"))),
            Node::element("ul").with_child(Node::element("li").with_child(Node::text("c"))),
            Node::text("d"),
        ])
    }

    fn names(fragment: &Fragment, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| {
                let node = fragment.node(id);
                node.tag_name()
                    .map(str::to_string)
                    .or_else(|| node.text().map(|t| format!("#{}", t)))
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn test_pre_order() {
        let fragment = tree();
        let visited: Vec<NodeId> = Walker::new(&fragment).collect();
        assert_eq!(
            names(&fragment, &visited),
            vec!["p", "#a", "b", "#b", "ul", "li", "#c", "#d"]
        );
    }

    #[test]
    fn test_visits_each_node_once() {
        let fragment = tree();
        let visited: Vec<NodeId> = Walker::new(&fragment).collect();
        assert_eq!(visited.len(), fragment.len());
        // arena order is document order
        assert!(visited.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_next_sibling_skips_subtree() {
        let fragment = tree();
        let mut walker = Walker::new(&fragment);
        let p = walker.next_node().unwrap();
        assert_eq!(fragment.node(p).tag_name(), Some("p"));
        let ul = walker.next_sibling().unwrap();
        assert_eq!(fragment.node(ul).tag_name(), Some("ul"));
        walker.next_node();
        let li_text_or_next = walker.next_sibling().unwrap();
        // skipping the li's subtree ascends out of the ul
        assert_eq!(fragment.node(li_text_or_next).text(), Some("d"));
        assert_eq!(walker.next_node(), None);
        assert_eq!(walker.next_node(), None);
    }

    #[test]
    fn test_reset_restarts() {
        let fragment = tree();
        let mut walker = Walker::new(&fragment);
        let first: Vec<NodeId> = walker.by_ref().collect();
        walker.reset();
        let second: Vec<NodeId> = walker.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = Fragment::new();
        let mut walker = Walker::new(&fragment);
        assert_eq!(walker.next_node(), None);
        assert_eq!(walker.advance(Directive::SkipChildren), None);
    }
}
