//! Folds the traversal and the formatting rules into one Markdown string.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fragment::{Fragment, NodeId, NodeRef};
use crate::normalize::{normalize, TextPosition};
use crate::options::Options;
use crate::rules::Rules;
use crate::traverse::{Directive, Walker};

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// A line holding nothing but a heading, bullet or ordered-list marker
static EMPTY_MARKER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:#{1,6}|[*+-]|\d+\.)[ \t]*(?:\n|$)").unwrap());

/// An element whose children are still being assembled
struct Frame {
    id: NodeId,
    content: String,
}

/// Walk the fragment and concatenate every node's contribution.
///
/// Elements with a `Descend` directive open a frame that collects their
/// children's Markdown; the frame is closed (and the element formatted) once
/// the walker leaves the element's subtree. Opaque elements are formatted on
/// the spot and the walker skips their descendants.
pub fn assemble(fragment: &Fragment, rules: &Rules, options: &Options) -> String {
    let mut output = String::new();
    let mut open: Vec<Frame> = Vec::new();
    let mut walker = Walker::new(fragment);

    let mut next = walker.next_node();
    while let Some(id) = next {
        close_frames(fragment, rules, options, &mut open, &mut output, fragment.parent(id));

        let node = fragment.node(id);
        let directive = if node.is_text() {
            let text = render_text(&node);
            target(&mut open, &mut output).push_str(&text);
            Directive::Descend
        } else {
            match rules.directive_for(&node, options) {
                Directive::SkipChildren => {
                    let result = rules.format(&node, "", options);
                    target(&mut open, &mut output).push_str(&result.text);
                    result.directive
                }
                Directive::Descend => {
                    open.push(Frame {
                        id,
                        content: String::new(),
                    });
                    Directive::Descend
                }
            }
        };

        next = walker.advance(directive);
    }
    close_frames(fragment, rules, options, &mut open, &mut output, None);

    output
}

/// Buffer that receives the next contribution
fn target<'a>(open: &'a mut [Frame], output: &'a mut String) -> &'a mut String {
    match open.last_mut() {
        Some(frame) => &mut frame.content,
        None => output,
    }
}

/// Format and pop every open element that is not `parent`
fn close_frames(
    fragment: &Fragment,
    rules: &Rules,
    options: &Options,
    open: &mut Vec<Frame>,
    output: &mut String,
    parent: Option<NodeId>,
) {
    while open.last().is_some_and(|frame| Some(frame.id) != parent) {
        let Some(frame) = open.pop() else {
            break;
        };
        let node = fragment.node(frame.id);
        let result = rules.format(&node, &frame.content, options);
        target(open, output).push_str(&result.text);
    }
}

fn render_text(node: &NodeRef) -> String {
    let Some(text) = node.text() else {
        return String::new();
    };
    let position = TextPosition {
        preformatted: node.has_ancestor(&["pre"]),
        first: node.is_first_child(),
        last: node.is_last_child(),
    };
    normalize(text, position)
}

/// Final cleanup of assembled Markdown.
///
/// Collapses runs of blank lines, trims the whole text, then drops lines left
/// holding only an empty heading or list marker. Fenced code is left as is.
pub fn cleanup(markdown: &str) -> String {
    let collapsed = outside_fences(markdown, |s| BLANK_RUNS.replace_all(s, "\n\n").into_owned());
    let stripped = outside_fences(collapsed.trim(), |s| {
        EMPTY_MARKER_LINE.replace_all(s, "").into_owned()
    });
    // removed lines can leave new blank runs behind
    let collapsed = outside_fences(&stripped, |s| BLANK_RUNS.replace_all(s, "\n\n").into_owned());
    collapsed.trim().to_string()
}

/// An open fenced code block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    ch: char,
    len: usize,
    /// Blockquote markers in front of the opening fence
    depth: usize,
}

/// Indentation, list markers and quote markers a fence may follow
static FENCE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[ \t]*(?:[*+-]|\d+\.)[ \t]+|[ \t]*>[ \t]?|[ \t]+)*").unwrap()
});

static QUOTE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[ \t]*>[ \t]?)*").unwrap());

fn prefix<'a>(pattern: &Regex, line: &'a str) -> &'a str {
    pattern.find(line).map_or("", |m| m.as_str())
}

fn quote_depth(lead: &str) -> usize {
    lead.matches('>').count()
}

/// Opening fence of a code block. A backtick fence's info string cannot
/// contain a backtick, which keeps long inline code spans out.
fn fence_open(line: &str) -> Option<Fence> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);
    let lead = prefix(&FENCE_PREFIX, line);
    let rest = &line[lead.len()..];
    let ch = rest.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = rest.chars().take_while(|&c| c == ch).count();
    let info = &rest[len * ch.len_utf8()..];
    if len < 3 || (ch == '`' && info.contains('`')) {
        return None;
    }
    Some(Fence {
        ch,
        len,
        depth: quote_depth(lead),
    })
}

fn fence_closes(line: &str, fence: Fence) -> bool {
    let lead = prefix(&QUOTE_PREFIX, line);
    let rest = line[lead.len()..].trim();
    quote_depth(lead) == fence.depth
        && rest.chars().count() >= fence.len
        && rest.chars().all(|c| c == fence.ch)
}

/// Byte ranges of the fenced code blocks in `text`, from the start of the
/// opening line to the end of the closing fence (its newline excluded).
/// An opener without a matching closer is ordinary text.
fn fenced_blocks(text: &str) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        lines.push((offset, line));
        offset += line.len();
    }

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let (start, line) = lines[i];
        let closing = fence_open(line).and_then(|fence| {
            lines[i + 1..]
                .iter()
                .position(|&(_, candidate)| fence_closes(candidate, fence))
                .map(|n| i + 1 + n)
        });
        match closing {
            Some(j) => {
                let (close_start, close_line) = lines[j];
                let end = close_start + close_line.strip_suffix('\n').unwrap_or(close_line).len();
                blocks.push(start..end);
                i = j + 1;
            }
            None => i += 1,
        }
    }
    blocks
}

/// Apply `f` to the text outside fenced code blocks
fn outside_fences<F>(text: &str, f: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for block in fenced_blocks(text) {
        result.push_str(&f(&text[last..block.start]));
        result.push_str(&text[block.clone()]);
        last = block.end;
    }
    result.push_str(&f(&text[last..]));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_collapses_blank_runs() {
        assert_eq!(cleanup("\n\na\n\n\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_cleanup_drops_empty_markers() {
        assert_eq!(cleanup("## \n\ntext"), "text");
        assert_eq!(cleanup("* a\n* \n* b"), "* a\n* b");
        assert_eq!(cleanup("1. a\n2.\n3. c"), "1. a\n3. c");
        assert_eq!(cleanup("text\n\n###"), "text");
    }

    #[test]
    fn test_cleanup_keeps_rules_and_content() {
        assert_eq!(cleanup("a\n\n***\n\nb"), "a\n\n***\n\nb");
        assert_eq!(cleanup("## Title"), "## Title");
    }

    #[test]
    fn test_cleanup_leaves_fenced_code_alone() {
        let markdown = "intro\n\n```sh\n#\n\n\n\necho\n```\n\n\n\nafter";
        assert_eq!(cleanup(markdown), "intro\n\n```sh\n#\n\n\n\necho\n```\n\nafter");
    }

    #[test]
    fn test_cleanup_after_fence_in_list_item() {
        let markdown = "\n\n* ```\nx\n\n\n\ny\n```\n\n\n### \n\nz";
        assert_eq!(cleanup(markdown), "* ```\nx\n\n\n\ny\n```\n\nz");
    }

    #[test]
    fn test_cleanup_after_fence_in_blockquote() {
        let markdown = "> ```\n> #\n> ```\n\n\n\n## \n\nz";
        assert_eq!(cleanup(markdown), "> ```\n> #\n> ```\n\nz");
    }

    #[test]
    fn test_cleanup_after_long_inline_code() {
        let markdown = "```a``b```\n\n> q\n\n\n\nz";
        assert_eq!(cleanup(markdown), "```a``b```\n\n> q\n\nz");
    }

    #[test]
    fn test_cleanup_unclosed_fence_is_text() {
        assert_eq!(cleanup("~~~\n\n### \n\n\n\ny"), "~~~\n\ny");
    }

    #[test]
    fn test_fence_detection() {
        let plain = Fence {
            ch: '`',
            len: 3,
            depth: 0,
        };
        assert_eq!(fence_open("```rust\n"), Some(plain));
        assert_eq!(fence_open("* ```\n"), Some(plain));
        assert_eq!(fence_open("  1. ```go\n"), Some(plain));
        assert_eq!(
            fence_open("~~~~\n"),
            Some(Fence {
                ch: '~',
                len: 4,
                depth: 0
            })
        );
        assert_eq!(fence_open("* > ```").map(|f| f.depth), Some(1));
        assert_eq!(fence_open("``x``"), None);
        assert_eq!(fence_open("```a``b```"), None);
        assert_eq!(fence_open("*```"), None);

        assert!(fence_closes("````\n", plain));
        assert!(!fence_closes("``\n", plain));
        assert!(!fence_closes("```rust\n", plain));
        assert!(!fence_closes("> ```\n", plain));
        assert!(fence_closes("> ```\n", Fence { depth: 1, ..plain }));
    }
}
