//! Built-in formatting rules for selected content.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule};
use crate::classify::{heading_level, HEADING_ELEMENTS, LIST_ELEMENTS};
use crate::fragment::NodeRef;
use crate::normalize::{collapse_whitespace, escape_delimiter, escape_inline, longest_run};
use crate::options::{LinkStyle, Options};

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)language-(\S+)").unwrap());

/// Create all built-in rules
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        heading_rule(),
        list_rule(),
        list_item_rule(),
        definition_term_rule(),
        definition_rule(),
        horizontal_rule(),
        line_break_rule(),
        code_block_rule(),
        code_in_block_rule(),
        code_rule(),
        strong_rule(),
        emphasis_rule(),
        image_rule(),
        blockquote_rule(),
        inline_link_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |node, content, _| {
        if node.is_first_element_child() {
            content.to_string()
        } else {
            format!("\n\n{}", content)
        }
    })
}

fn heading_rule() -> Rule {
    Rule::for_tags(HEADING_ELEMENTS, |node, content, _| {
        let level = node.tag_name().and_then(heading_level).unwrap_or(1);
        format!("\n\n{} {}", "#".repeat(level), content)
    })
}

/// Drop leading blank lines and trailing whitespace, keeping the indentation
/// of a nested list's first marker
fn trim_block(content: &str) -> &str {
    content.trim_start_matches(&['\n', '\r'][..]).trim_end()
}

fn list_rule() -> Rule {
    Rule::for_tags(LIST_ELEMENTS, |node, content, _| {
        let leading = if node.has_ancestor(&["li"]) { "\n" } else { "\n\n" };
        format!("{}{}\n", leading, trim_block(content))
    })
}

fn list_item_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "li" && node.has_ancestor(LIST_ELEMENTS)),
        |node, content, options| {
            let depth = node.count_ancestors(LIST_ELEMENTS);
            let indent = options.list_indent.repeat(depth.saturating_sub(1));
            // a leading sub-list shares the item's marker line
            let content = if starts_with_list(node) {
                content.trim()
            } else {
                trim_block(content)
            };
            format!("\n{}{} {}", indent, list_marker(node, options), content)
        },
    )
}

/// First child that is not blank text is a list
fn starts_with_list(node: &NodeRef) -> bool {
    node.children()
        .find(|child| !child.is_whitespace_only_text())
        .is_some_and(|child| child.is_any_kind(LIST_ELEMENTS))
}

/// `*` under an unordered list, `<n>.` under an ordered one
fn list_marker(node: &NodeRef, options: &Options) -> String {
    match node.closest(LIST_ELEMENTS) {
        Some(list) if list.is_kind("ol") => {
            let start = list
                .attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            format!("{}.", start.saturating_add(node.position_among_kind() as i64 - 1))
        }
        _ => options.bullet_list_marker.to_string(),
    }
}

fn definition_term_rule() -> Rule {
    Rule::for_tag("dt", |node, content, _| {
        let after_definition = node
            .previous_element_sibling()
            .is_some_and(|prev| prev.is_kind("dd"));
        if after_definition {
            format!("\n\n{}", content)
        } else {
            format!("\n{}", content)
        }
    })
}

fn definition_rule() -> Rule {
    Rule::for_tag("dd", |_, content, _| format!("\n{}", content))
}

fn horizontal_rule() -> Rule {
    Rule::opaque(Filter::tag("hr"), |_, _, options| {
        format!("\n\n{}\n", options.hr)
    })
}

fn line_break_rule() -> Rule {
    Rule::opaque(Filter::tag("br"), |_, _, _| "  \n".to_string())
}

fn code_block_rule() -> Rule {
    Rule::opaque(Filter::tag("pre"), |node, _, options| {
        let language = node
            .element_children()
            .find(|c| c.is_kind("code"))
            .and_then(|code| code.attr("class"))
            .and_then(|class| LANGUAGE_CLASS.captures(class))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");

        let text = node.text_content();
        let code = text.trim_matches(&['\n', '\r'][..]);
        let fence = fence_for(code, &options.fence);

        format!("\n\n{}{}\n{}\n{}\n\n", fence, language, code, fence)
    })
}

/// The configured fence, lengthened past any run of its character in `code`
fn fence_for(code: &str, fence: &str) -> String {
    let Some(fence_char) = fence.chars().next() else {
        return "```".to_string();
    };
    let needed = longest_run(code, fence_char) + 1;
    let width = fence.chars().count().max(needed);
    fence_char.to_string().repeat(width)
}

fn code_in_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "code" && node.has_ancestor(&["pre"])),
        |_, content, _| content.to_string(),
    )
}

fn code_rule() -> Rule {
    Rule::opaque(Filter::tag("code"), |node, _, _| {
        let content = collapse_whitespace(&node.text_content());
        if content.trim().is_empty() {
            return String::new();
        }

        let backticks = "`".repeat(longest_run(&content, '`') + 1);
        if content.starts_with('`') || content.ends_with('`') {
            format!("{} {} {}", backticks, content, backticks)
        } else {
            format!("{}{}{}", backticks, content, backticks)
        }
    })
}

/// Collapsed, trimmed and escaped text of an opaque inline element
fn inline_text(node: &NodeRef) -> String {
    escape_inline(collapse_whitespace(&node.text_content()).trim())
}

fn strong_rule() -> Rule {
    Rule::opaque(Filter::tags(&["strong", "b"]), |node, _, options| {
        let text = inline_text(node);
        if text.is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{}{}{}", delimiter, escape_delimiter(&text, delimiter), delimiter)
    })
}

fn emphasis_rule() -> Rule {
    Rule::opaque(Filter::tags(&["em", "i"]), |node, _, options| {
        let text = inline_text(node);
        if text.is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter.to_string();
        format!("{}{}{}", delimiter, escape_delimiter(&text, &delimiter), delimiter)
    })
}

/// Clean an attribute value (trim and handle empty)
fn clean_attribute(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn title_part(node: &NodeRef) -> String {
    let title = clean_attribute(node.attr("title"));
    if title.is_empty() {
        String::new()
    } else {
        format!(" \"{}\"", title.replace('"', "\\\""))
    }
}

/// Keep `\\` and `]` in alt text from ending the image label
fn escape_alt(alt: &str) -> String {
    alt.replace('\\', "\\\\").replace(']', "\\]")
}

fn image_rule() -> Rule {
    Rule::opaque(Filter::tag("img"), |node, _, _| {
        let alt = escape_alt(&clean_attribute(node.attr("alt")));
        let src = clean_attribute(node.attr("src"));
        if src.is_empty() {
            return String::new();
        }

        format!("![{}]({}{})", alt, src, title_part(node))
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "a"
                && matches!(options.link_style, LinkStyle::Inlined)
                && !clean_attribute(node.attr("href")).is_empty()
        }),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            format!("[{}]({}{})", content.trim(), href, title_part(node))
        },
    )
}
