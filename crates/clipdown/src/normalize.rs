//! Text run normalization and Markdown escaping.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::is_whitespace_only;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Where a text run sits relative to its siblings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextPosition {
    /// Inside `pre` (or another preformatted context)
    pub preformatted: bool,
    /// First child of its parent
    pub first: bool,
    /// Last child of its parent
    pub last: bool,
}

/// Normalize a text run for inline Markdown output.
///
/// Whitespace-only runs vanish. Preformatted runs pass through verbatim.
/// Everything else has its whitespace runs collapsed to one space, backticks
/// and opening brackets escaped, and is trimmed on the side(s) where it
/// touches its parent's boundary.
pub fn normalize(text: &str, position: TextPosition) -> String {
    if is_whitespace_only(text) {
        return String::new();
    }
    if position.preformatted {
        return text.to_string();
    }

    let mut result = escape_inline(&collapse_whitespace(text));
    if position.first {
        result = result.trim_start().to_string();
    }
    if position.last {
        result.truncate(result.trim_end().len());
    }
    result
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Escape characters that would open a code span or a link/image token
pub fn escape_inline(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '`' | '[' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Backslash-escape each occurrence of an emphasis delimiter
pub fn escape_delimiter(text: &str, delimiter: &str) -> String {
    if delimiter.is_empty() {
        return text.to_string();
    }
    let escaped: String = delimiter.chars().flat_map(|c| ['\\', c]).collect();
    text.replace(delimiter, &escaped)
}

/// Length of the longest run of consecutive `ch` characters
pub fn longest_run(text: &str, ch: char) -> usize {
    text.chars()
        .fold((0, 0), |(max, current), c| {
            if c == ch {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0
}
