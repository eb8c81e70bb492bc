//! Node-kind registry.
//!
//! Every construct the dispatcher can hand to a [`Renderer`](crate::Renderer)
//! has exactly one entry in [`REGISTRY`]. The entry records the kind's
//! category, the shape of its arguments, and what happens when the renderer
//! declines to handle it.

use std::fmt;
use std::str::FromStr;

/// Renderable construct, named after its [`Renderer`](crate::Renderer) method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    BlockCode,
    BlockQuote,
    Header,
    HRule,
    List,
    ListItem,
    Paragraph,
    Table,
    TableHeader,
    TableBody,
    TableRow,
    TableCell,
    Footnotes,
    FootnoteDef,
    BlockHtml,
    Autolink,
    CodeSpan,
    DoubleEmphasis,
    Emphasis,
    Underline,
    Highlight,
    Quote,
    Image,
    LineBreak,
    Link,
    TripleEmphasis,
    Strikethrough,
    Superscript,
    FootnoteRef,
    Math,
    RawHtml,
    Entity,
    NormalText,
    DocHeader,
    DocFooter,
}

/// Where a kind sits in the document structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Whole structural units (paragraphs, lists, tables).
    Block,
    /// Inline runs inside a block.
    Span,
    /// Literal text and entities.
    LowLevel,
    /// Brackets around the whole render pass.
    Document,
}

/// What the dispatcher appends when a renderer returns `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Fallback {
    /// Nothing; the construct disappears from the output.
    Omit,
    /// The construct's markdown source, unescaped.
    SourceVerbatim,
    /// The text argument itself.
    CopyThrough,
    /// Nothing; there is no construct to lose.
    Nothing,
}

/// Arguments a kind's method receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArgShape {
    /// No arguments.
    None,
    /// Rendered inner content.
    Content,
    /// Raw, unrendered text.
    Text,
    /// Raw text plus code block language.
    TextLanguage,
    /// Content plus heading level 1-6.
    ContentLevel,
    /// Content plus [`ListFlags`](crate::ListFlags).
    ContentListFlags,
    /// Content plus [`TableFlags`](crate::TableFlags).
    ContentTableFlags,
    /// Content plus 1-based footnote ordinal.
    ContentOrdinal,
    /// 1-based footnote ordinal.
    Ordinal,
    /// Link target plus [`AutolinkType`](crate::AutolinkType).
    LinkType,
    /// Content, link target, and title.
    ContentLinkTitle,
    /// Link target, title, and alt text.
    LinkTitleAlt,
    /// Raw text plus display-mode flag.
    TextDisplayMode,
    /// Inline-render flag.
    InlineFlag,
}

/// Registry entry for one node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KindInfo {
    /// The kind this entry describes.
    pub kind: NodeKind,
    /// Renderer method name.
    pub name: &'static str,
    /// Structural category.
    pub category: Category,
    /// Arguments passed to the renderer.
    pub shape: ArgShape,
    /// Behavior when the renderer defers.
    pub fallback: Fallback,
}

const fn entry(kind: NodeKind, name: &'static str, category: Category, shape: ArgShape) -> KindInfo {
    let fallback = match category {
        Category::Block => Fallback::Omit,
        Category::Span => Fallback::SourceVerbatim,
        Category::LowLevel => Fallback::CopyThrough,
        Category::Document => Fallback::Nothing,
    };
    KindInfo {
        kind,
        name,
        category,
        shape,
        fallback,
    }
}

/// The registry, in [`NodeKind::ALL`] order.
pub static REGISTRY: [KindInfo; 35] = [
    entry(NodeKind::BlockCode, "blockcode", Category::Block, ArgShape::TextLanguage),
    entry(NodeKind::BlockQuote, "blockquote", Category::Block, ArgShape::Content),
    entry(NodeKind::Header, "header", Category::Block, ArgShape::ContentLevel),
    entry(NodeKind::HRule, "hrule", Category::Block, ArgShape::None),
    entry(NodeKind::List, "list", Category::Block, ArgShape::ContentListFlags),
    entry(NodeKind::ListItem, "listitem", Category::Block, ArgShape::ContentListFlags),
    entry(NodeKind::Paragraph, "paragraph", Category::Block, ArgShape::Content),
    entry(NodeKind::Table, "table", Category::Block, ArgShape::Content),
    entry(NodeKind::TableHeader, "table_header", Category::Block, ArgShape::Content),
    entry(NodeKind::TableBody, "table_body", Category::Block, ArgShape::Content),
    entry(NodeKind::TableRow, "table_row", Category::Block, ArgShape::Content),
    entry(NodeKind::TableCell, "table_cell", Category::Block, ArgShape::ContentTableFlags),
    entry(NodeKind::Footnotes, "footnotes", Category::Block, ArgShape::Content),
    entry(NodeKind::FootnoteDef, "footnote_def", Category::Block, ArgShape::ContentOrdinal),
    entry(NodeKind::BlockHtml, "blockhtml", Category::Block, ArgShape::Text),
    entry(NodeKind::Autolink, "autolink", Category::Span, ArgShape::LinkType),
    entry(NodeKind::CodeSpan, "codespan", Category::Span, ArgShape::Text),
    entry(NodeKind::DoubleEmphasis, "double_emphasis", Category::Span, ArgShape::Content),
    entry(NodeKind::Emphasis, "emphasis", Category::Span, ArgShape::Content),
    entry(NodeKind::Underline, "underline", Category::Span, ArgShape::Content),
    entry(NodeKind::Highlight, "highlight", Category::Span, ArgShape::Content),
    entry(NodeKind::Quote, "quote", Category::Span, ArgShape::Content),
    entry(NodeKind::Image, "image", Category::Span, ArgShape::LinkTitleAlt),
    entry(NodeKind::LineBreak, "linebreak", Category::Span, ArgShape::None),
    entry(NodeKind::Link, "link", Category::Span, ArgShape::ContentLinkTitle),
    entry(NodeKind::TripleEmphasis, "triple_emphasis", Category::Span, ArgShape::Content),
    entry(NodeKind::Strikethrough, "strikethrough", Category::Span, ArgShape::Content),
    entry(NodeKind::Superscript, "superscript", Category::Span, ArgShape::Content),
    entry(NodeKind::FootnoteRef, "footnote_ref", Category::Span, ArgShape::Ordinal),
    entry(NodeKind::Math, "math", Category::Span, ArgShape::TextDisplayMode),
    entry(NodeKind::RawHtml, "raw_html", Category::Span, ArgShape::Text),
    entry(NodeKind::Entity, "entity", Category::LowLevel, ArgShape::Text),
    entry(NodeKind::NormalText, "normal_text", Category::LowLevel, ArgShape::Text),
    entry(NodeKind::DocHeader, "doc_header", Category::Document, ArgShape::InlineFlag),
    entry(NodeKind::DocFooter, "doc_footer", Category::Document, ArgShape::InlineFlag),
];

impl NodeKind {
    /// Every kind, in registry order.
    pub const ALL: [NodeKind; 35] = [
        NodeKind::BlockCode,
        NodeKind::BlockQuote,
        NodeKind::Header,
        NodeKind::HRule,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Paragraph,
        NodeKind::Table,
        NodeKind::TableHeader,
        NodeKind::TableBody,
        NodeKind::TableRow,
        NodeKind::TableCell,
        NodeKind::Footnotes,
        NodeKind::FootnoteDef,
        NodeKind::BlockHtml,
        NodeKind::Autolink,
        NodeKind::CodeSpan,
        NodeKind::DoubleEmphasis,
        NodeKind::Emphasis,
        NodeKind::Underline,
        NodeKind::Highlight,
        NodeKind::Quote,
        NodeKind::Image,
        NodeKind::LineBreak,
        NodeKind::Link,
        NodeKind::TripleEmphasis,
        NodeKind::Strikethrough,
        NodeKind::Superscript,
        NodeKind::FootnoteRef,
        NodeKind::Math,
        NodeKind::RawHtml,
        NodeKind::Entity,
        NodeKind::NormalText,
        NodeKind::DocHeader,
        NodeKind::DocFooter,
    ];

    /// Registry entry for this kind.
    #[must_use]
    pub fn info(self) -> &'static KindInfo {
        // Discriminants follow declaration order, which is registry order.
        &REGISTRY[self as usize]
    }

    /// Renderer method name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Structural category.
    #[must_use]
    pub fn category(self) -> Category {
        self.info().category
    }

    /// Behavior when the renderer defers.
    #[must_use]
    pub fn fallback(self) -> Fallback {
        self.info().fallback
    }

    /// Arguments passed to the renderer.
    #[must_use]
    pub fn shape(self) -> ArgShape {
        self.info().shape
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name matches no node kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .find(|info| info.name == s)
            .map(|info| info.kind)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Block => "block",
            Self::Span => "span",
            Self::LowLevel => "low-level",
            Self::Document => "document",
        })
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Omit => "omit",
            Self::SourceVerbatim => "source-verbatim",
            Self::CopyThrough => "copy-through",
            Self::Nothing => "nothing",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_matches_all_order() {
        for (index, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(REGISTRY[index].kind, *kind, "entry {index} out of order");
            assert_eq!(kind.info().kind, *kind);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = REGISTRY.iter().map(|info| info.name).collect();
        assert_eq!(names.len(), REGISTRY.len());
    }

    #[test]
    fn test_category_counts() {
        let count = |category| {
            REGISTRY
                .iter()
                .filter(|info| info.category == category)
                .count()
        };
        assert_eq!(count(Category::Block), 15);
        assert_eq!(count(Category::Span), 16);
        assert_eq!(count(Category::LowLevel), 2);
        assert_eq!(count(Category::Document), 2);
    }

    #[test]
    fn test_fallback_follows_category() {
        assert_eq!(NodeKind::Paragraph.fallback(), Fallback::Omit);
        assert_eq!(NodeKind::Emphasis.fallback(), Fallback::SourceVerbatim);
        assert_eq!(NodeKind::NormalText.fallback(), Fallback::CopyThrough);
        assert_eq!(NodeKind::DocFooter.fallback(), Fallback::Nothing);
    }

    #[test]
    fn test_table_cell_is_its_own_kind() {
        let cell: NodeKind = "table_cell".parse().unwrap();
        assert_eq!(cell, NodeKind::TableCell);
        assert_ne!(cell, NodeKind::TableRow);
        assert_eq!(cell.shape(), ArgShape::ContentTableFlags);
    }

    #[test]
    fn test_from_str_roundtrip_names() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.name().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "subscript".parse::<NodeKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown node kind: subscript");
    }

    #[test]
    fn test_display_uses_method_name() {
        assert_eq!(NodeKind::DoubleEmphasis.to_string(), "double_emphasis");
        assert_eq!(Category::LowLevel.to_string(), "low-level");
        assert_eq!(Fallback::SourceVerbatim.to_string(), "source-verbatim");
    }
}
