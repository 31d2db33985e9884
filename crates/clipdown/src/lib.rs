//! # clipdown
//!
//! Convert a selected markup fragment to Markdown.
//!
//! The input is the cloned subtree of a user's selection: any number of
//! root-level element and text nodes, possibly cut mid-structure. The output is
//! trimmed Markdown covering paragraphs, headings, nested lists, definition
//! lists, code (fenced and inline), emphasis, rules, line breaks, images and
//! blockquotes. Conversion never fails; elements without a dedicated rule
//! simply pass their children through.
//!
//! ## Design
//!
//! - A [`Fragment`] stores the selection in an arena with parent indices.
//! - A [`Walker`] enumerates its nodes in document order and can skip a
//!   subtree once an opaque element (code, strong, emphasis) has rendered it.
//! - [`Rules`] map element kinds to formatters returning a [`FormatResult`].
//! - The assembler folds everything into a string and cleans it up.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use clipdown::{ClipdownService, Fragment, Node};
//!
//! let list = Node::element("ul")
//!     .with_child(Node::element("li").with_child(Node::text("First")))
//!     .with_child(Node::element("li").with_child(Node::text("Second")));
//!
//! let service = ClipdownService::new();
//! let markdown = service.serialize(&Fragment::from_node(list));
//! assert_eq!(markdown, "* First\n* Second");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use clipdown::ClipdownService;
//!
//! let service = ClipdownService::new();
//! let markdown = service.convert_html("<h2>Title</h2>");
//! assert_eq!(markdown, "## Title");
//! ```

mod assembler;
pub mod classify;
pub mod fragment;
#[cfg(feature = "html")]
pub mod html;
pub mod message;
pub mod node;
pub mod normalize;
mod options;
mod rules;
mod service;
pub mod traverse;

pub use assembler::{assemble, cleanup};
pub use fragment::{Fragment, MarkupNode, NodeId, NodeRef};
#[cfg(feature = "html")]
pub use html::parse_html;
pub use message::{ConvertRequest, ConvertResponse};
pub use node::{Node, NodeType};
pub use options::{LinkStyle, Options};
pub use rules::{Filter, FormatResult, PredicateFn, ReplacementFn, Rule, Rules};
pub use service::{serialize, ClipdownService};
pub use traverse::{Directive, Walker};

/// Error type for the surfaces around the converter.
///
/// Conversion itself is total; these errors come from decoding requests and
/// reading input.
#[derive(Debug, thiserror::Error)]
pub enum ClipdownError {
    #[error("Malformed message: {0}")]
    Message(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ClipdownError>;
