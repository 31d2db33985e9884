//! Configuration options for Markdown output

use serde::Deserialize;

/// How anchor elements are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Emit only the link text
    #[default]
    Passthrough,
    /// Use inline links [text](url)
    Inlined,
}

/// Options for Markdown output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Indentation added per nested list level
    pub list_indent: String,

    /// Horizontal rule string
    pub hr: String,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Link style
    pub link_style: LinkStyle,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bullet_list_marker: '*',
            list_indent: "  ".to_string(),
            hr: "***".to_string(),
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::Passthrough,
        }
    }
}
