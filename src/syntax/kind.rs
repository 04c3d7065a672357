//! Node kinds produced by the markdown parser.

use std::fmt;

/// The type of a syntax node.
///
/// Names follow the usual markdown grammar naming (`FencedCode`,
/// `InlineCode`, `ATXHeading`, ...) so trees from different providers can
/// be classified against the same type-name sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    FrontMatter,
    FrontMatterCode,
    Paragraph,
    ATXHeading,
    SetextHeading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    Task,
    Table,
    TableRow,
    TableCell,
    HorizontalRule,
    CodeBlock,
    FencedCode,
    CodeText,
    HTMLBlock,
    CommentBlock,
    FootnoteDefinition,
    Emphasis,
    StrongEmphasis,
    Strikethrough,
    Link,
    Image,
    InlineCode,
    HTMLTag,
    Comment,
    HardBreak,
    FootnoteReference,
    Attribute,
    CommandLink,
    TemplateDirective,
    LuaDirective,
    /// Anything the parser produces that has no dedicated kind.
    Other,
}

impl NodeKind {
    /// The node type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::FrontMatter => "FrontMatter",
            Self::FrontMatterCode => "FrontMatterCode",
            Self::Paragraph => "Paragraph",
            Self::ATXHeading => "ATXHeading",
            Self::SetextHeading => "SetextHeading",
            Self::Blockquote => "Blockquote",
            Self::BulletList => "BulletList",
            Self::OrderedList => "OrderedList",
            Self::ListItem => "ListItem",
            Self::Task => "Task",
            Self::Table => "Table",
            Self::TableRow => "TableRow",
            Self::TableCell => "TableCell",
            Self::HorizontalRule => "HorizontalRule",
            Self::CodeBlock => "CodeBlock",
            Self::FencedCode => "FencedCode",
            Self::CodeText => "CodeText",
            Self::HTMLBlock => "HTMLBlock",
            Self::CommentBlock => "CommentBlock",
            Self::FootnoteDefinition => "FootnoteDefinition",
            Self::Emphasis => "Emphasis",
            Self::StrongEmphasis => "StrongEmphasis",
            Self::Strikethrough => "Strikethrough",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::InlineCode => "InlineCode",
            Self::HTMLTag => "HTMLTag",
            Self::Comment => "Comment",
            Self::HardBreak => "HardBreak",
            Self::FootnoteReference => "FootnoteReference",
            Self::Attribute => "Attribute",
            Self::CommandLink => "CommandLink",
            Self::TemplateDirective => "TemplateDirective",
            Self::LuaDirective => "LuaDirective",
            Self::Other => "Other",
        }
    }

    /// Content is raw text the directive scanner must not look into.
    pub const fn is_verbatim(self) -> bool {
        matches!(
            self,
            Self::FrontMatter
                | Self::FrontMatterCode
                | Self::CodeBlock
                | Self::FencedCode
                | Self::CodeText
                | Self::InlineCode
                | Self::HTMLBlock
                | Self::CommentBlock
                | Self::Comment
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
