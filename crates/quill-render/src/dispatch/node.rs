//! Typed arguments for each node kind, and the call into the renderer.

use crate::kind::NodeKind;
use crate::renderer::{AutolinkType, ListFlags, Renderer, TableFlags};

/// One finished construct, ready to hand to a renderer.
///
/// Variants line up one-to-one with [`NodeKind`]; the fields are exactly the
/// arguments of the matching [`Renderer`] method.
#[derive(Clone, Copy, Debug)]
pub(super) enum Node<'n> {
    BlockCode { text: &'n str, lang: &'n str },
    BlockQuote { content: &'n str },
    Header { content: &'n str, level: u8 },
    HRule,
    List { content: &'n str, flags: ListFlags },
    ListItem { content: &'n str, flags: ListFlags },
    Paragraph { content: &'n str },
    Table { content: &'n str },
    TableHeader { content: &'n str },
    TableBody { content: &'n str },
    TableRow { content: &'n str },
    TableCell { content: &'n str, flags: TableFlags },
    Footnotes { content: &'n str },
    FootnoteDef { content: &'n str, num: u32 },
    BlockHtml { text: &'n str },
    Autolink { link: &'n str, kind: AutolinkType },
    CodeSpan { text: &'n str },
    DoubleEmphasis { content: &'n str },
    Emphasis { content: &'n str },
    Underline { content: &'n str },
    Highlight { content: &'n str },
    Quote { content: &'n str },
    Image { link: &'n str, title: &'n str, alt: &'n str },
    LineBreak,
    Link { content: &'n str, link: &'n str, title: &'n str },
    TripleEmphasis { content: &'n str },
    Strikethrough { content: &'n str },
    Superscript { content: &'n str },
    FootnoteRef { num: u32 },
    Math { text: &'n str, display_mode: bool },
    RawHtml { text: &'n str },
    Entity { text: &'n str },
    NormalText { text: &'n str },
    DocHeader { inline_render: bool },
    DocFooter { inline_render: bool },
}

impl Node<'_> {
    pub(super) fn kind(&self) -> NodeKind {
        match self {
            Self::BlockCode { .. } => NodeKind::BlockCode,
            Self::BlockQuote { .. } => NodeKind::BlockQuote,
            Self::Header { .. } => NodeKind::Header,
            Self::HRule => NodeKind::HRule,
            Self::List { .. } => NodeKind::List,
            Self::ListItem { .. } => NodeKind::ListItem,
            Self::Paragraph { .. } => NodeKind::Paragraph,
            Self::Table { .. } => NodeKind::Table,
            Self::TableHeader { .. } => NodeKind::TableHeader,
            Self::TableBody { .. } => NodeKind::TableBody,
            Self::TableRow { .. } => NodeKind::TableRow,
            Self::TableCell { .. } => NodeKind::TableCell,
            Self::Footnotes { .. } => NodeKind::Footnotes,
            Self::FootnoteDef { .. } => NodeKind::FootnoteDef,
            Self::BlockHtml { .. } => NodeKind::BlockHtml,
            Self::Autolink { .. } => NodeKind::Autolink,
            Self::CodeSpan { .. } => NodeKind::CodeSpan,
            Self::DoubleEmphasis { .. } => NodeKind::DoubleEmphasis,
            Self::Emphasis { .. } => NodeKind::Emphasis,
            Self::Underline { .. } => NodeKind::Underline,
            Self::Highlight { .. } => NodeKind::Highlight,
            Self::Quote { .. } => NodeKind::Quote,
            Self::Image { .. } => NodeKind::Image,
            Self::LineBreak => NodeKind::LineBreak,
            Self::Link { .. } => NodeKind::Link,
            Self::TripleEmphasis { .. } => NodeKind::TripleEmphasis,
            Self::Strikethrough { .. } => NodeKind::Strikethrough,
            Self::Superscript { .. } => NodeKind::Superscript,
            Self::FootnoteRef { .. } => NodeKind::FootnoteRef,
            Self::Math { .. } => NodeKind::Math,
            Self::RawHtml { .. } => NodeKind::RawHtml,
            Self::Entity { .. } => NodeKind::Entity,
            Self::NormalText { .. } => NodeKind::NormalText,
            Self::DocHeader { .. } => NodeKind::DocHeader,
            Self::DocFooter { .. } => NodeKind::DocFooter,
        }
    }

    /// Call the renderer method for this node.
    pub(super) fn invoke<R: Renderer + ?Sized>(self, renderer: &mut R) -> Option<String> {
        match self {
            Self::BlockCode { text, lang } => renderer.blockcode(text, lang),
            Self::BlockQuote { content } => renderer.blockquote(content),
            Self::Header { content, level } => renderer.header(content, level),
            Self::HRule => renderer.hrule(),
            Self::List { content, flags } => renderer.list(content, flags),
            Self::ListItem { content, flags } => renderer.listitem(content, flags),
            Self::Paragraph { content } => renderer.paragraph(content),
            Self::Table { content } => renderer.table(content),
            Self::TableHeader { content } => renderer.table_header(content),
            Self::TableBody { content } => renderer.table_body(content),
            Self::TableRow { content } => renderer.table_row(content),
            Self::TableCell { content, flags } => renderer.table_cell(content, flags),
            Self::Footnotes { content } => renderer.footnotes(content),
            Self::FootnoteDef { content, num } => renderer.footnote_def(content, num),
            Self::BlockHtml { text } => renderer.blockhtml(text),
            Self::Autolink { link, kind } => renderer.autolink(link, kind),
            Self::CodeSpan { text } => renderer.codespan(text),
            Self::DoubleEmphasis { content } => renderer.double_emphasis(content),
            Self::Emphasis { content } => renderer.emphasis(content),
            Self::Underline { content } => renderer.underline(content),
            Self::Highlight { content } => renderer.highlight(content),
            Self::Quote { content } => renderer.quote(content),
            Self::Image { link, title, alt } => renderer.image(link, title, alt),
            Self::LineBreak => renderer.linebreak(),
            Self::Link {
                content,
                link,
                title,
            } => renderer.link(content, link, title),
            Self::TripleEmphasis { content } => renderer.triple_emphasis(content),
            Self::Strikethrough { content } => renderer.strikethrough(content),
            Self::Superscript { content } => renderer.superscript(content),
            Self::FootnoteRef { num } => renderer.footnote_ref(num),
            Self::Math { text, display_mode } => renderer.math(text, display_mode),
            Self::RawHtml { text } => renderer.raw_html(text),
            Self::Entity { text } => renderer.entity(text),
            Self::NormalText { text } => renderer.normal_text(text),
            Self::DocHeader { inline_render } => renderer.doc_header(inline_render),
            Self::DocFooter { inline_render } => renderer.doc_footer(inline_render),
        }
    }
}
