//! ClipdownService - the main entry point for fragment to Markdown conversion.

use crate::assembler::{assemble, cleanup};
use crate::fragment::Fragment;
use crate::message::{ConvertRequest, ConvertResponse};
use crate::options::Options;
use crate::rules::{Filter, Rule, Rules};

/// The main service for converting selected fragments to Markdown
pub struct ClipdownService {
    options: Options,
    rules: Rules,
}

impl ClipdownService {
    /// Create a new ClipdownService with default options
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            rules: Rules::new(),
        }
    }

    /// Create a ClipdownService with custom options
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Convert a fragment to trimmed Markdown.
    ///
    /// Never fails: elements without a dedicated rule pass their children
    /// through, and an empty fragment yields an empty string.
    pub fn serialize(&self, fragment: &Fragment) -> String {
        if fragment.is_empty() {
            log::debug!("empty selection, nothing to serialize");
            return String::new();
        }

        let assembled = assemble(fragment, &self.rules, &self.options);
        let markdown = cleanup(&assembled);
        log::debug!(
            "serialized {} nodes into {} bytes of markdown",
            fragment.len(),
            markdown.len()
        );
        markdown
    }

    /// Convert a selection that may be absent (collapsed caret, no range)
    pub fn convert_selection(&self, selection: Option<&Fragment>) -> String {
        selection.map(|f| self.serialize(f)).unwrap_or_default()
    }

    /// Answer a conversion request from the triggering surface.
    ///
    /// The command identifier is opaque to the converter and only logged.
    pub fn handle_request(
        &self,
        request: &ConvertRequest,
        selection: Option<&Fragment>,
    ) -> ConvertResponse {
        log::debug!("handling command {:?}", request.message);
        ConvertResponse {
            markdown: self.convert_selection(selection),
        }
    }

    /// Parse an HTML snippet and convert it
    #[cfg(feature = "html")]
    pub fn convert_html(&self, html: &str) -> String {
        self.serialize(&crate::html::parse_html(html))
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Keep elements matching the filter as HTML
    pub fn keep(&mut self, filter: Filter) -> &mut Self {
        self.rules.keep(filter);
        self
    }

    /// Remove elements matching the filter
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }
}

impl Default for ClipdownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a fragment with the default options and rules
pub fn serialize(fragment: &Fragment) -> String {
    ClipdownService::new().serialize(fragment)
}
