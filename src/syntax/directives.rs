//! Inline directives layered on top of the markdown tree.
//!
//! comrak has no notion of `${lua}` expressions, `{{templates}}`,
//! `{[command links]}` or `[key: value]` attributes, so they are found with
//! a regex pass over the source and spliced into the tree afterwards.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::kind::NodeKind;
use super::parser::SourceIndex;
use super::tree::TreeBuilder;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<lua>\$\{[^}\n]*\})",
        r"|(?P<template>\{\{[^\n]*?\}\})",
        r"|(?P<command>\{\[[^\n]*?\]\})",
        r"|(?P<attribute>\[[\p{L}\p{N}_-]+:[^\]\n]*\])",
    ))
    .expect("directive pattern is valid")
});

/// A directive occurrence, in byte offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    kind: NodeKind,
    bytes: Range<usize>,
}

/// Find directives in `source`, leftmost match first.
fn find_directives(source: &str) -> Vec<Directive> {
    DIRECTIVE
        .captures_iter(source)
        .filter_map(|caps| {
            let (kind, m) = if let Some(m) = caps.name("lua") {
                (NodeKind::LuaDirective, m)
            } else if let Some(m) = caps.name("template") {
                (NodeKind::TemplateDirective, m)
            } else if let Some(m) = caps.name("command") {
                (NodeKind::CommandLink, m)
            } else {
                let m = caps.name("attribute")?;
                if is_link_bracket(source, m.range()) {
                    return None;
                }
                (NodeKind::Attribute, m)
            };
            Some(Directive {
                kind,
                bytes: m.range(),
            })
        })
        .collect()
}

/// `[text: more](url)`, `[[page: x]]` and `![alt: x]` are links, not attributes.
fn is_link_bracket(source: &str, bytes: Range<usize>) -> bool {
    let before = source[..bytes.start].chars().next_back();
    let after = source[bytes.end..].chars().next();
    matches!(before, Some('[' | '!')) || matches!(after, Some('(' | '[' | ']'))
}

/// Splice directive nodes into `builder`, skipping any that touch verbatim
/// content such as code or front matter.
pub(super) fn scan(source: &str, index: &SourceIndex, builder: &mut TreeBuilder) {
    let verbatim: Vec<Range<usize>> = builder
        .nodes()
        .filter(|(kind, _)| kind.is_verbatim())
        .map(|(_, span)| span)
        .collect();

    for directive in find_directives(source) {
        let span =
            index.byte_to_char(directive.bytes.start)..index.byte_to_char(directive.bytes.end);
        if verbatim
            .iter()
            .any(|code| code.start < span.end && span.start < code.end)
        {
            continue;
        }
        builder.insert(directive.kind, span);
    }
}
