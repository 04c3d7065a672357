//! Cursor context classification.

use crate::syntax::{SyntaxNode, SyntaxTree};

/// Node types whose content is taken verbatim. Typing a quote anywhere
/// beneath one of these keeps the straight quote.
pub const LITERAL_CONTEXTS: [&str; 10] = [
    "CommentBlock",
    "CodeBlock",
    "CodeText",
    "FencedCode",
    "InlineCode",
    "FrontMatterCode",
    "Attribute",
    "CommandLink",
    "TemplateDirective",
    "LuaDirective",
];

/// Whether smart substitution is allowed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Prose,
    Literal,
}

pub fn is_literal(type_name: &str) -> bool {
    LITERAL_CONTEXTS.contains(&type_name)
}

/// Classify `offset` by walking from the innermost node at that offset up
/// to the root.
pub fn classify<T: SyntaxTree>(tree: &T, offset: usize) -> Context {
    let mut node = Some(tree.resolve_inner(offset));
    while let Some(current) = node {
        if is_literal(current.type_name()) {
            return Context::Literal;
        }
        node = current.parent();
    }
    Context::Prose
}
