//! Arena-backed syntax tree with parent links.

use std::ops::Range;

use super::kind::NodeKind;
use super::{SyntaxNode, SyntaxTree};

/// Index of a node inside a [`MarkdownTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Range<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed document: nodes stored flat, root at index 0.
///
/// Spans are char offsets with an exclusive end.
#[derive(Debug, Clone)]
pub struct MarkdownTree {
    nodes: Vec<NodeData>,
}

impl MarkdownTree {
    pub const fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root_id())
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len()).map(|idx| self.node(NodeId(idx)))
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl SyntaxTree for MarkdownTree {
    type Node<'a> = NodeRef<'a>;

    /// Innermost node strictly covering `offset`.
    ///
    /// A node is only entered when `start < offset < end`, so a cursor sitting
    /// right before or right after a node resolves to its parent. The root is
    /// returned when nothing narrower covers the offset.
    fn resolve_inner(&self, offset: usize) -> NodeRef<'_> {
        let mut current = self.root_id();
        loop {
            let next = self
                .data(current)
                .children
                .iter()
                .copied()
                .find(|child| {
                    let span = &self.data(*child).span;
                    span.start < offset && offset < span.end
                });
            match next {
                Some(child) => current = child,
                None => return self.node(current),
            }
        }
    }
}

/// Borrowed handle to a node of a [`MarkdownTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a MarkdownTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.data(self.id).kind
    }

    pub fn span(&self) -> Range<usize> {
        self.tree.data(self.id).span.clone()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |id| tree.node(*id))
    }
}

impl SyntaxNode for NodeRef<'_> {
    fn type_name(&self) -> &str {
        self.kind().name()
    }

    fn parent(&self) -> Option<Self> {
        self.tree
            .data(self.id)
            .parent
            .map(|id| self.tree.node(id))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{:?}", self.kind(), self.span())
    }
}

/// Incremental construction of a [`MarkdownTree`].
///
/// Used by the markdown parser and handy for building trees by hand in
/// tests or from other parsers.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Start a tree whose `Document` root spans `0..len`.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                span: 0..len,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn span(&self, id: NodeId) -> Range<usize> {
        self.nodes[id.0].span.clone()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Kind and span of every node added so far.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKind, Range<usize>)> + '_ {
        self.nodes.iter().map(|node| (node.kind, node.span.clone()))
    }

    /// Append a child under `parent`.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, span: Range<usize>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Insert a node under the innermost node containing `span`.
    ///
    /// Children of that node lying entirely inside `span` are moved under the
    /// new node.
    pub fn insert(&mut self, kind: NodeKind, span: Range<usize>) -> NodeId {
        let mut parent = self.root();
        while let Some(child) = self.nodes[parent.0].children.iter().copied().find(|child| {
            let child_span = &self.nodes[child.0].span;
            child_span.start <= span.start && span.end <= child_span.end
        }) {
            parent = child;
        }

        let (adopted, kept): (Vec<NodeId>, Vec<NodeId>) = self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .partition(|child| {
                let child_span = &self.nodes[child.0].span;
                span.start <= child_span.start && child_span.end <= span.end
            });
        self.nodes[parent.0].children = kept;

        let id = self.push(parent, kind, span);
        for child in &adopted {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes[id.0].children = adopted;
        id
    }

    pub fn finish(self) -> MarkdownTree {
        MarkdownTree { nodes: self.nodes }
    }
}
