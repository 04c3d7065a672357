//! Markdown parsing with comrak.

use std::ops::Range;

use comrak::nodes::{AstNode, LineColumn, ListType, NodeValue, Sourcepos};
use comrak::{Arena, Options, parse_document};
use ropey::Rope;

use super::directives;
use super::kind::NodeKind;
use super::tree::{MarkdownTree, NodeId, TreeBuilder};

const FRONT_MATTER_DELIMITER: &str = "---";

impl MarkdownTree {
    /// Parse markdown source into a syntax tree.
    ///
    /// # Example
    ///
    /// ```
    /// use smartmark::syntax::{MarkdownTree, NodeKind, SyntaxTree};
    ///
    /// let tree = MarkdownTree::parse("```\nlet x = 1;\n```\n");
    /// assert_eq!(tree.resolve_inner(6).kind(), NodeKind::CodeText);
    /// ```
    pub fn parse(source: &str) -> Self {
        parse(source)
    }
}

/// Never fails: comrak accepts any input.
fn parse(source: &str) -> MarkdownTree {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let index = SourceIndex::new(source);
    let mut builder = TreeBuilder::new(index.len_chars());
    let root_id = builder.root();
    for child in root.children() {
        process_node(child, root_id, source, &index, &mut builder);
    }
    directives::scan(source, &index, &mut builder);
    builder.finish()
}

fn create_options() -> Options {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options.extension.front_matter_delimiter = Some(FRONT_MATTER_DELIMITER.to_string());
    options.render.sourcepos = true;

    options
}

fn process_node<'a>(
    node: &'a AstNode<'a>,
    parent: NodeId,
    source: &str,
    index: &SourceIndex,
    builder: &mut TreeBuilder,
) {
    let ast = node.data.borrow();
    let span = index.span(ast.sourcepos);

    let id = match &ast.value {
        // Plain text is the gap between nodes, not a node of its own.
        NodeValue::Text(_) | NodeValue::SoftBreak => return,

        NodeValue::FrontMatter(literal) => {
            push_front_matter(source, literal, parent, index, builder);
            return;
        }

        NodeValue::CodeBlock(block) => {
            let kind = if block.fenced {
                NodeKind::FencedCode
            } else {
                NodeKind::CodeBlock
            };
            let id = builder.push(parent, kind, span.clone());
            let content = if block.fenced {
                let fence = std::iter::repeat_n(block.fence_char as char, block.fence_length)
                    .collect::<String>();
                fenced_content(ast.sourcepos, &fence, index, span)
            } else {
                Some(span)
            };
            if let Some(content) = content {
                builder.push(id, NodeKind::CodeText, content);
            }
            return;
        }

        // HTML blocks always run to the end of their last line.
        NodeValue::HtmlBlock(_) => {
            let end = index.line_start(ast.sourcepos.end.line).max(span.end);
            builder.push(parent, kind_for(&ast.value), span.start..end)
        }

        value => builder.push(parent, kind_for(value), span),
    };

    for child in node.children() {
        process_node(child, id, source, index, builder);
    }
}

fn kind_for(value: &NodeValue) -> NodeKind {
    match value {
        NodeValue::Document => NodeKind::Document,
        NodeValue::Paragraph => NodeKind::Paragraph,
        NodeValue::Heading(heading) if heading.setext => NodeKind::SetextHeading,
        NodeValue::Heading(_) => NodeKind::ATXHeading,
        NodeValue::BlockQuote => NodeKind::Blockquote,
        NodeValue::List(list) => match list.list_type {
            ListType::Bullet => NodeKind::BulletList,
            ListType::Ordered => NodeKind::OrderedList,
        },
        NodeValue::Item(_) => NodeKind::ListItem,
        NodeValue::TaskItem(_) => NodeKind::Task,
        NodeValue::Table(_) => NodeKind::Table,
        NodeValue::TableRow(_) => NodeKind::TableRow,
        NodeValue::TableCell => NodeKind::TableCell,
        NodeValue::ThematicBreak => NodeKind::HorizontalRule,
        NodeValue::HtmlBlock(html) if html.literal.trim_start().starts_with("<!--") => {
            NodeKind::CommentBlock
        }
        NodeValue::HtmlBlock(_) => NodeKind::HTMLBlock,
        NodeValue::FootnoteDefinition(_) => NodeKind::FootnoteDefinition,
        NodeValue::Emph => NodeKind::Emphasis,
        NodeValue::Strong => NodeKind::StrongEmphasis,
        NodeValue::Strikethrough => NodeKind::Strikethrough,
        NodeValue::Link(_) => NodeKind::Link,
        NodeValue::Image(_) => NodeKind::Image,
        NodeValue::Code(_) => NodeKind::InlineCode,
        NodeValue::HtmlInline(html) if html.starts_with("<!--") => NodeKind::Comment,
        NodeValue::HtmlInline(_) => NodeKind::HTMLTag,
        NodeValue::LineBreak => NodeKind::HardBreak,
        NodeValue::FootnoteReference(_) => NodeKind::FootnoteReference,
        _ => NodeKind::Other,
    }
}

/// Content lines of a fenced block: from the line after the opening fence
/// up to the closing fence, or to the end of the block when unclosed.
fn fenced_content(
    pos: Sourcepos,
    fence: &str,
    index: &SourceIndex,
    block: Range<usize>,
) -> Option<Range<usize>> {
    let start = index.line_start(pos.start.line).min(block.end);
    let closed = pos.end.line > pos.start.line
        && index
            .line_text(pos.end.line - 1)
            .trim_start()
            .starts_with(fence);
    let end = if closed {
        index.line_start(pos.end.line - 1)
    } else {
        block.end
    };
    (start < end).then_some(start..end)
}

/// Front matter sits at the very start of the document, so its extent is
/// read off the source rather than from positions.
fn push_front_matter(
    source: &str,
    literal: &str,
    parent: NodeId,
    index: &SourceIndex,
    builder: &mut TreeBuilder,
) {
    let mut lines = source.split_inclusive('\n');
    let Some(opening) = lines.next() else {
        return;
    };
    let inner_start = opening.len();
    let mut offset = inner_start;
    let mut closing = None;
    for line in lines {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            closing = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let (inner_end, outer_end) = closing.unwrap_or((literal.len(), literal.len()));
    let outer = 0..index.byte_to_char(outer_end.min(source.len()));
    let id = builder.push(parent, NodeKind::FrontMatter, outer);
    let inner_start = index.byte_to_char(inner_start.min(source.len()));
    let inner_end = index.byte_to_char(inner_end.min(source.len()));
    if inner_start < inner_end {
        builder.push(id, NodeKind::FrontMatterCode, inner_start..inner_end);
    }
}

/// Maps comrak's 1-based line / byte-column positions to char offsets.
pub(super) struct SourceIndex {
    rope: Rope,
}

impl SourceIndex {
    pub(super) fn new(source: &str) -> Self {
        Self {
            rope: Rope::from_str(source),
        }
    }

    pub(super) fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub(super) fn byte_to_char(&self, byte: usize) -> usize {
        self.rope.byte_to_char(byte.min(self.rope.len_bytes()))
    }

    /// Char offset where 0-based line `line_idx` starts.
    fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line_idx)
    }

    fn line_text(&self, line_idx: usize) -> String {
        if line_idx >= self.rope.len_lines() {
            return String::new();
        }
        self.rope.line(line_idx).to_string()
    }

    fn start(&self, pos: LineColumn) -> usize {
        if pos.line == 0 {
            return 0;
        }
        let line_idx = pos.line - 1;
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let byte = self.rope.line_to_byte(line_idx) + pos.column.saturating_sub(1);
        self.byte_to_char(byte)
    }

    /// `pos` points at the last byte of the node, so the exclusive end is
    /// one char past the char containing it.
    fn end(&self, pos: LineColumn) -> usize {
        if pos.line == 0 {
            return 0;
        }
        let line_idx = pos.line - 1;
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_byte = self.rope.line_to_byte(line_idx);
        if pos.column == 0 {
            return self.rope.byte_to_char(line_byte);
        }
        let byte = line_byte + pos.column - 1;
        if byte >= self.rope.len_bytes() {
            return self.rope.len_chars();
        }
        self.rope.byte_to_char(byte) + 1
    }

    fn span(&self, pos: Sourcepos) -> Range<usize> {
        let start = self.start(pos.start);
        let end = self.end(pos.end).max(start);
        start..end
    }
}
