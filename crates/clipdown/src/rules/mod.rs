//! Rule system for element formatting.

mod builtin;
mod rule;

pub use builtin::builtin_rules;
pub use rule::{Filter, FormatResult, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::fragment::NodeRef;
use crate::options::Options;
use crate::traverse::Directive;

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first)
    custom_rules: IndexMap<String, Rule>,
    /// Keep rules (preserve as HTML)
    keep_rules: Vec<Filter>,
    /// Remove rules (drop entirely)
    remove_rules: Vec<Filter>,
    /// Built-in rules
    builtin_rules: Vec<Rule>,
    /// Fallback for elements nothing else matches
    passthrough: Rule,
}

impl Rules {
    /// Create a new Rules instance with the built-in rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            keep_rules: Vec::new(),
            remove_rules: Vec::new(),
            builtin_rules: builtin_rules(),
            passthrough: Rule::passthrough(),
        }
    }

    /// Add a custom rule. Re-using a key replaces the earlier rule.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a keep filter
    pub fn keep(&mut self, filter: Filter) {
        self.keep_rules.push(filter);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Find the custom or built-in rule for an element
    pub fn for_node<'a>(&'a self, node: &NodeRef, options: &Options) -> Option<&'a Rule> {
        let tag = node.tag_name()?;

        self.custom_rules
            .values()
            .chain(self.builtin_rules.iter())
            .find(|rule| rule.filter.matches(tag, node, options))
    }

    /// Format an element.
    ///
    /// Custom and built-in rules win over keep filters, keep filters win over
    /// remove filters, and anything left unmatched passes its children through.
    pub fn format(&self, node: &NodeRef, content: &str, options: &Options) -> FormatResult {
        if let Some(rule) = self.for_node(node, options) {
            return rule.apply(node, content, options);
        }

        let tag = node.tag_name().unwrap_or_default();
        if self.keep_rules.iter().any(|f| f.matches(tag, node, options)) {
            return FormatResult {
                text: node.outer_html(),
                directive: Directive::SkipChildren,
            };
        }
        if self.remove_rules.iter().any(|f| f.matches(tag, node, options)) {
            return FormatResult {
                text: String::new(),
                directive: Directive::SkipChildren,
            };
        }

        self.passthrough.apply(node, content, options)
    }

    /// Directive an element will produce, decided before its children are
    /// assembled
    pub fn directive_for(&self, node: &NodeRef, options: &Options) -> Directive {
        if let Some(rule) = self.for_node(node, options) {
            return rule.directive;
        }

        let tag = node.tag_name().unwrap_or_default();
        let opaque = self
            .keep_rules
            .iter()
            .chain(self.remove_rules.iter())
            .any(|f| f.matches(tag, node, options));
        if opaque {
            Directive::SkipChildren
        } else {
            log::debug!("passing through unrecognized element <{}>", tag);
            Directive::Descend
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
