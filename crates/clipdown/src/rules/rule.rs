//! Rule and Filter types for element formatting.

use crate::fragment::NodeRef;
use crate::options::Options;
use crate::traverse::Directive;

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&NodeRef, &str, &Options) -> String + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &Options) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &Options) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node
    pub fn matches(&self, tag: &str, node: &NodeRef, options: &Options) -> bool {
        match self {
            Filter::TagName(t) => tag == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == tag),
            Filter::Predicate(f) => f(tag, node, options),
        }
    }
}

/// Output of formatting one element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatResult {
    /// Markdown to append
    pub text: String,
    /// How traversal continues after this element
    pub directive: Directive,
}

/// A rule defines how to convert a matched element to Markdown.
///
/// A `Descend` rule receives the assembled Markdown of the element's children
/// as `content`. A `SkipChildren` rule is opaque: it receives an empty
/// `content`, reads whatever it needs from the node itself, and traversal
/// resumes after the element.
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Whether the element's children are visited
    pub directive: Directive,
    /// Replacement function that generates Markdown
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule whose children are visited
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &Options) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            directive: Directive::Descend,
            replacement: Box::new(replacement),
        }
    }

    /// Create an opaque rule that renders the element in one step
    pub fn opaque<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &Options) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            directive: Directive::SkipChildren,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &Options) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &Options) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Rule for elements with no dedicated formatting: children pass through
    pub fn passthrough() -> Self {
        Self::new(Filter::predicate(|_, _, _| true), |_, content, _| {
            content.to_string()
        })
    }

    /// Apply this rule's replacement
    pub fn apply(&self, node: &NodeRef, content: &str, options: &Options) -> FormatResult {
        FormatResult {
            text: (self.replacement)(node, content, options),
            directive: self.directive,
        }
    }
}
