//! Markdown syntax trees.
//!
//! This module handles:
//! - The provider traits the quote interceptor reads ([`SyntaxTree`],
//!   [`SyntaxNode`])
//! - An arena tree with parent links ([`MarkdownTree`])
//! - Building that tree from markdown with comrak, plus a scanner for
//!   inline directives comrak knows nothing about

mod directives;
mod kind;
mod parser;
mod tree;

pub use kind::NodeKind;
pub use tree::{MarkdownTree, NodeId, NodeRef, TreeBuilder};

/// A borrowed handle to one node of a syntax tree.
///
/// Handles are cheap to copy and only valid for the tree snapshot they came
/// from.
pub trait SyntaxNode: Copy {
    /// The node type name, e.g. `FencedCode`.
    fn type_name(&self) -> &str;

    /// The enclosing node, or `None` at the root.
    fn parent(&self) -> Option<Self>;
}

/// A parsed document that can be queried by offset.
pub trait SyntaxTree {
    type Node<'a>: SyntaxNode
    where
        Self: 'a;

    /// The innermost node covering `offset`.
    fn resolve_inner(&self, offset: usize) -> Self::Node<'_>;
}

/// Iterate from `node` up to the root, `node` included.
pub fn ancestors<N: SyntaxNode>(node: N) -> impl Iterator<Item = N> {
    std::iter::successors(Some(node), SyntaxNode::parent)
}

/// Type names from the innermost node at `offset` up to the root.
pub fn context_chain<T: SyntaxTree>(tree: &T, offset: usize) -> Vec<String> {
    ancestors(tree.resolve_inner(offset))
        .map(|node| node.type_name().to_string())
        .collect()
}
