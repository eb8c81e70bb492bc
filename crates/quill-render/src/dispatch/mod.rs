//! Dispatch bridge from parser events to [`Renderer`] calls.
//!
//! The parser reports constructs as start/end event pairs. The dispatcher
//! keeps a stack of open constructs, each with its own output buffer. Children
//! render into their parent's buffer; when a construct ends, its buffer becomes
//! the `content` argument of the renderer call, and the result (or the
//! registry fallback) is appended to the next buffer down.

mod frame;
mod node;
mod scan;

use std::borrow::Cow;
use std::ops::Range;

use pulldown_cmark::{Event, LinkType, Tag, TagEnd};

use crate::buffer::{BufferPool, OUTPUT_UNIT, OutputBuffer};
use crate::error::RenderError;
use crate::extensions::Extensions;
use crate::kind::Fallback;
use crate::renderer::{AutolinkType, ListFlags, Renderer};
use crate::util::{fence_language, heading_level_to_num};

use frame::{Construct, Footnotes, Frame, TableState};
use node::Node;
use scan::{Delimiter, Segment};

/// Deepest construct nesting that still reaches the renderer.
///
/// Constructs opened deeper than this are flattened: their content goes to
/// the parent as-is, without a renderer call.
pub const MAX_NESTING: usize = 16;

pub(crate) struct Dispatcher<'a, 'r, R: Renderer + ?Sized> {
    source: &'a str,
    renderer: &'r mut R,
    extensions: Extensions,
    inline: bool,
    max_nesting: usize,
    output: OutputBuffer,
    pool: BufferPool,
    frames: Vec<Frame>,
    /// Open frames that count toward the nesting ceiling.
    depth: usize,
    footnotes: Footnotes,
    link_depth: usize,
    image_depth: usize,
    /// Source skipped at the start of continuation lines: container markers
    /// and indentation. Sorted, non-overlapping.
    line_gaps: Vec<Range<usize>>,
    /// End of the last line break, until the next event shows where the
    /// following line's content starts.
    break_end: Option<usize>,
}

impl<'a, 'r, R: Renderer + ?Sized> Dispatcher<'a, 'r, R> {
    pub(crate) fn new(
        source: &'a str,
        renderer: &'r mut R,
        extensions: Extensions,
        inline: bool,
        max_nesting: usize,
    ) -> Self {
        Self {
            source,
            renderer,
            extensions,
            inline,
            max_nesting,
            output: OutputBuffer::with_capacity(OUTPUT_UNIT),
            pool: BufferPool::new(),
            frames: Vec::new(),
            depth: 0,
            footnotes: Footnotes::default(),
            link_depth: 0,
            image_depth: 0,
            line_gaps: Vec::new(),
            break_end: None,
        }
    }

    /// Emit the document header.
    pub(crate) fn begin(&mut self) -> Result<(), RenderError> {
        let inline_render = self.inline;
        self.dispatch(Node::DocHeader { inline_render }, "")
    }

    /// Handle one parser event and its source range.
    pub(crate) fn feed(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), RenderError> {
        self.track_line_gap(&event, &range);
        if self.image_depth > 0 {
            return self.image_alt(event);
        }
        if self
            .frames
            .last()
            .is_some_and(|frame| frame.construct.collects_raw())
        {
            return match event {
                Event::End(_) => self.close(),
                Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) | Event::Code(text) => {
                    self.sink().append_str(&text)
                }
                _ => Ok(()),
            };
        }

        let raw = self.slice(range.clone());
        match event {
            Event::Start(tag) => {
                self.open(tag, range);
                Ok(())
            }
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text, range),
            Event::Code(text) => self.dispatch(Node::CodeSpan { text: &text }, raw),
            Event::InlineMath(text) => self.dispatch(
                Node::Math {
                    text: &text,
                    display_mode: false,
                },
                raw,
            ),
            Event::DisplayMath(text) => self.dispatch(
                Node::Math {
                    text: &text,
                    display_mode: true,
                },
                raw,
            ),
            Event::Html(html) | Event::InlineHtml(html) => self.dispatch(Node::RawHtml { text: &html }, &html),
            Event::FootnoteReference(label) => {
                let num = self.footnotes.reference(&label);
                self.dispatch(Node::FootnoteRef { num }, raw)
            }
            Event::SoftBreak => self.dispatch(Node::NormalText { text: "\n" }, "\n"),
            Event::HardBreak => self.dispatch(Node::LineBreak, raw),
            Event::Rule => self.dispatch(Node::HRule, raw),
            Event::TaskListMarker(_) => self.dispatch(Node::NormalText { text: raw }, raw),
        }
    }

    /// Close anything still open, flush footnotes and emit the document footer.
    pub(crate) fn finish(mut self) -> Result<OutputBuffer, RenderError> {
        self.unwind_delimited()?;
        while !self.frames.is_empty() {
            self.close()?;
        }
        self.flush_footnotes()?;
        let inline_render = self.inline;
        self.dispatch(Node::DocFooter { inline_render }, "")?;
        debug_assert_eq!(self.pool.outstanding(), 0);
        Ok(self.output)
    }

    fn slice(&self, range: Range<usize>) -> &'a str {
        self.source.get(range).unwrap_or_default()
    }

    fn track_line_gap(&mut self, event: &Event<'_>, range: &Range<usize>) {
        if let Some(end) = self.break_end.take()
            && range.start > end
        {
            self.line_gaps.push(end..range.start);
        }
        if matches!(event, Event::SoftBreak | Event::HardBreak) {
            self.break_end = Some(range.end);
        }
    }

    /// Source of a construct without the line prefixes of its containers.
    fn span_source(&self, range: Range<usize>) -> Cow<'a, str> {
        let first = self.line_gaps.partition_point(|gap| gap.start < range.start);
        let count = self.line_gaps[first..]
            .iter()
            .take_while(|gap| gap.end <= range.end)
            .count();
        let gaps = &self.line_gaps[first..first + count];
        if gaps.is_empty() {
            return Cow::Borrowed(self.slice(range));
        }
        let mut out = String::with_capacity(range.len());
        let mut at = range.start;
        for gap in gaps {
            out.push_str(self.slice(at..gap.start));
            at = gap.end;
        }
        out.push_str(self.slice(at..range.end));
        Cow::Owned(out)
    }

    fn sink(&mut self) -> &mut OutputBuffer {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.content,
            None => &mut self.output,
        }
    }

    /// Call the renderer and append its output, or the kind's fallback.
    fn dispatch(&mut self, node: Node<'_>, source: &str) -> Result<(), RenderError> {
        let kind = node.kind();
        match node.invoke(&mut *self.renderer) {
            Some(rendered) => self.sink().append_str(&rendered),
            None => match kind.fallback() {
                Fallback::SourceVerbatim | Fallback::CopyThrough => self.sink().append_str(source),
                Fallback::Omit | Fallback::Nothing => Ok(()),
            },
        }
    }

    fn push(&mut self, construct: Construct, range: Range<usize>) {
        let counted = construct.counts_toward_nesting();
        let flattened = counted && self.depth >= self.max_nesting;
        if flattened {
            tracing::debug!(depth = self.depth, "Nesting limit reached, flattening construct");
        }
        if counted {
            self.depth += 1;
        }
        let content = self.pool.acquire();
        self.frames.push(Frame {
            construct,
            content,
            range,
            flattened,
        });
    }

    fn open(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let construct = match tag {
            Tag::Paragraph => {
                if let Some(Frame {
                    construct: Construct::ListItem(flags),
                    ..
                }) = self.frames.last_mut()
                {
                    *flags |= ListFlags::BLOCK;
                }
                if self.inline && self.frames.is_empty() {
                    Construct::Transparent
                } else {
                    Construct::Paragraph
                }
            }
            Tag::Heading { level, .. } => Construct::Header(heading_level_to_num(level)),
            Tag::BlockQuote(_) => Construct::BlockQuote,
            Tag::CodeBlock(kind) => Construct::BlockCode {
                lang: fence_language(&kind),
            },
            Tag::HtmlBlock => Construct::BlockHtml,
            Tag::List(start) => Construct::List(if start.is_some() {
                ListFlags::ORDERED
            } else {
                ListFlags::empty()
            }),
            Tag::Item => {
                let ordered = match self.frames.last() {
                    Some(Frame {
                        construct: Construct::List(flags),
                        ..
                    }) => *flags & ListFlags::ORDERED,
                    _ => ListFlags::empty(),
                };
                Construct::ListItem(ordered)
            }
            Tag::Table(alignments) => Construct::Table(TableState::new(alignments)),
            Tag::TableHead => {
                if let Some(table) = self.table_mut() {
                    table.in_head = true;
                    table.cell = 0;
                }
                // The parser has no separate header row; synthesize one.
                self.push(Construct::TableHeader, range.clone());
                Construct::TableRow
            }
            Tag::TableRow => {
                let mut open_body = false;
                if let Some(table) = self.table_mut() {
                    open_body = !table.body_open;
                    table.body_open = true;
                    table.cell = 0;
                }
                if open_body {
                    self.push(Construct::TableBody, range.clone());
                }
                Construct::TableRow
            }
            Tag::TableCell => {
                let flags = self
                    .table_mut()
                    .map(|table| table.cell_flags())
                    .unwrap_or_default();
                Construct::TableCell(flags)
            }
            Tag::FootnoteDefinition(label) => Construct::FootnoteDef(label.to_string()),
            Tag::Emphasis => {
                if self.merges_into_triple(false, &range) {
                    Construct::Transparent
                } else {
                    let underline =
                        self.extensions.contains(Extensions::UNDERLINE) && self.slice(range.clone()).starts_with('_');
                    Construct::Emphasis {
                        underline,
                        triple: false,
                    }
                }
            }
            Tag::Strong => {
                if self.merges_into_triple(true, &range) {
                    Construct::Transparent
                } else {
                    Construct::Strong { triple: false }
                }
            }
            Tag::Strikethrough => Construct::Strikethrough,
            Tag::Superscript => Construct::Superscript,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                self.link_depth += 1;
                let autolink = match link_type {
                    LinkType::Autolink => Some(AutolinkType::Normal),
                    LinkType::Email => Some(AutolinkType::Email),
                    _ => None,
                };
                Construct::Link {
                    dest: dest_url.to_string(),
                    title: title.to_string(),
                    autolink,
                }
            }
            Tag::Image { dest_url, title, .. } => {
                self.image_depth = 1;
                Construct::Image {
                    dest: dest_url.to_string(),
                    title: title.to_string(),
                }
            }
            Tag::Subscript
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::MetadataBlock(_) => Construct::Transparent,
        };
        self.push(construct, range);
    }

    fn end(&mut self, tag: TagEnd) -> Result<(), RenderError> {
        self.unwind_delimited()?;
        match tag {
            TagEnd::TableHead => {
                self.close()?;
                self.close()?;
                if let Some(table) = self.table_mut() {
                    table.in_head = false;
                }
                Ok(())
            }
            TagEnd::TableCell => {
                self.close()?;
                if let Some(table) = self.table_mut() {
                    table.cell += 1;
                }
                Ok(())
            }
            TagEnd::Table => {
                if matches!(
                    self.frames.last(),
                    Some(Frame {
                        construct: Construct::TableBody,
                        ..
                    })
                ) {
                    self.close()?;
                }
                self.close()
            }
            _ => self.close(),
        }
    }

    fn table_mut(&mut self) -> Option<&mut TableState> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| match &mut frame.construct {
                Construct::Table(table) => Some(table),
                _ => None,
            })
    }

    /// Whether an emphasis run nested exactly inside the other kind, within
    /// `***` or `___` delimiters, should fold into its parent as triple emphasis.
    fn merges_into_triple(&mut self, inner_strong: bool, inner: &Range<usize>) -> bool {
        let source = self.source;
        let Some(outer) = self.frames.last_mut() else {
            return false;
        };
        let offset = if inner_strong { 1 } else { 2 };
        let outer_text = source.get(outer.range.clone()).unwrap_or_default();
        let delimited = outer_text.len() > 6
            && ((outer_text.starts_with("***") && outer_text.ends_with("***"))
                || (outer_text.starts_with("___") && outer_text.ends_with("___")));
        let fits = !outer.flattened
            && delimited
            && inner.start == outer.range.start + offset
            && inner.end + offset == outer.range.end;
        if !fits {
            return false;
        }
        match &mut outer.construct {
            Construct::Emphasis { triple, .. } if inner_strong => {
                *triple = true;
                true
            }
            Construct::Strong { triple } if !inner_strong => {
                *triple = true;
                true
            }
            _ => false,
        }
    }

    fn close(&mut self) -> Result<(), RenderError> {
        let Some(frame) = self.frames.pop() else {
            return Ok(());
        };
        if frame.construct.counts_toward_nesting() {
            self.depth -= 1;
        }
        let result = self.finish_frame(&frame);
        self.pool.release(frame.content);
        result
    }

    fn finish_frame(&mut self, frame: &Frame) -> Result<(), RenderError> {
        // Frames only see `append_str`, but `OutputBuffer` is a byte buffer
        // and decoding is how its content becomes a `&str` argument.
        let content = frame.content.as_str()?;
        match &frame.construct {
            Construct::Link { .. } => self.link_depth = self.link_depth.saturating_sub(1),
            Construct::ListItem(flags) if flags.contains(ListFlags::BLOCK) => {
                if let Some(Frame {
                    construct: Construct::List(list),
                    ..
                }) = self.frames.last_mut()
                {
                    *list |= ListFlags::BLOCK;
                }
            }
            Construct::FootnoteDef(label) => {
                self.footnotes.define(label, content.to_owned());
                return Ok(());
            }
            _ => {}
        }

        if frame.flattened {
            if frame.construct.collects_raw() {
                return self.dispatch(Node::NormalText { text: content }, content);
            }
            return self.sink().append_str(content);
        }

        let node = match &frame.construct {
            Construct::Paragraph => Node::Paragraph { content },
            Construct::Header(level) => Node::Header {
                content,
                level: *level,
            },
            Construct::BlockQuote => Node::BlockQuote { content },
            Construct::BlockCode { lang } => Node::BlockCode { text: content, lang },
            Construct::BlockHtml => Node::BlockHtml { text: content },
            Construct::List(flags) => Node::List {
                content,
                flags: *flags,
            },
            Construct::ListItem(flags) => Node::ListItem {
                content,
                flags: *flags,
            },
            Construct::Table(_) => Node::Table { content },
            Construct::TableHeader => Node::TableHeader { content },
            Construct::TableBody => Node::TableBody { content },
            Construct::TableRow => Node::TableRow { content },
            Construct::TableCell(flags) => Node::TableCell {
                content,
                flags: *flags,
            },
            Construct::Footnotes => Node::Footnotes { content },
            Construct::Emphasis { triple: true, .. } | Construct::Strong { triple: true } => {
                Node::TripleEmphasis { content }
            }
            Construct::Emphasis { underline: true, .. } => Node::Underline { content },
            Construct::Emphasis { .. } => Node::Emphasis { content },
            Construct::Strong { .. } => Node::DoubleEmphasis { content },
            Construct::Strikethrough => Node::Strikethrough { content },
            Construct::Superscript => Node::Superscript { content },
            Construct::Link {
                dest,
                autolink: Some(kind),
                ..
            } => Node::Autolink {
                link: dest,
                kind: *kind,
            },
            Construct::Link {
                dest,
                title,
                autolink: None,
            } => Node::Link {
                content,
                link: dest,
                title,
            },
            Construct::Image { dest, title } => Node::Image {
                link: dest,
                title,
                alt: content,
            },
            Construct::Delimited(Delimiter::Highlight) => Node::Highlight { content },
            Construct::Delimited(Delimiter::Quote) => Node::Quote { content },
            Construct::FootnoteDef(_) | Construct::Transparent => return self.sink().append_str(content),
        };
        let source = self.span_source(frame.range.clone());
        self.dispatch(node, &source)
    }

    /// Collect image description text. Nested markup contributes only its text.
    fn image_alt(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        match event {
            Event::Start(Tag::Image { .. }) => {
                self.image_depth += 1;
                Ok(())
            }
            Event::End(TagEnd::Image) => {
                self.image_depth -= 1;
                if self.image_depth == 0 { self.close() } else { Ok(()) }
            }
            Event::Text(text) | Event::Code(text) | Event::InlineMath(text) | Event::DisplayMath(text) => {
                self.sink().append_str(&text)
            }
            Event::SoftBreak | Event::HardBreak => self.sink().append_str(" "),
            _ => Ok(()),
        }
    }

    fn text(&mut self, text: &str, range: Range<usize>) -> Result<(), RenderError> {
        let raw = self.slice(range.clone());
        if is_entity(raw, text) {
            return self.dispatch(Node::Entity { text: raw }, raw);
        }
        if self.link_depth > 0 || !self.extensions.scans_text() {
            return self.dispatch(Node::NormalText { text }, text);
        }
        // Offsets into `text` are source offsets only if nothing was unescaped.
        let base = (raw == text).then_some(range.start);
        for segment in scan::segments(text, self.extensions) {
            match segment {
                Segment::Text(plain) => self.dispatch(Node::NormalText { text: plain }, plain)?,
                Segment::Marker {
                    delimiter,
                    at,
                    opens,
                    closes,
                } => {
                    let marker = delimiter.marker();
                    let end = base.map_or(range.end, |base| base + at + marker.len());
                    if closes && self.close_delimited(delimiter, end)? {
                        continue;
                    }
                    if opens {
                        let start = base.map_or(range.start, |base| base + at);
                        self.push(Construct::Delimited(delimiter), start..range.end);
                    } else {
                        self.dispatch(Node::NormalText { text: marker }, marker)?;
                    }
                }
                Segment::Url { link, raw } => self.dispatch(
                    Node::Autolink {
                        link: &link,
                        kind: AutolinkType::Normal,
                    },
                    raw,
                )?,
            }
        }
        Ok(())
    }

    /// Close the innermost frame if it is an open `delimiter` span with
    /// content. `end` is the source offset just past the closing delimiter.
    fn close_delimited(&mut self, delimiter: Delimiter, end: usize) -> Result<bool, RenderError> {
        let Some(frame) = self.frames.last_mut() else {
            return Ok(false);
        };
        if !matches!(frame.construct, Construct::Delimited(open) if open == delimiter) {
            return Ok(false);
        }
        let content = frame.content.contents();
        let tight = match content.last() {
            None => false,
            Some(last) => delimiter == Delimiter::Quote || !last.is_ascii_whitespace(),
        };
        if !tight {
            return Ok(false);
        }
        frame.range.end = end;
        self.close()?;
        Ok(true)
    }

    /// Turn unclosed highlight and quote openers on top of the stack back
    /// into text: the delimiter followed by whatever rendered after it.
    fn unwind_delimited(&mut self) -> Result<(), RenderError> {
        while let Some(Frame {
            construct: Construct::Delimited(delimiter),
            ..
        }) = self.frames.last()
        {
            let marker = delimiter.marker();
            let Some(frame) = self.frames.pop() else {
                break;
            };
            self.depth -= 1;
            let result = self
                .dispatch(Node::NormalText { text: marker }, marker)
                .and_then(|()| {
                    let content = frame.content.as_str()?;
                    self.sink().append_str(content)
                });
            self.pool.release(frame.content);
            result?;
        }
        Ok(())
    }

    fn flush_footnotes(&mut self) -> Result<(), RenderError> {
        let definitions = self.footnotes.take_referenced();
        if definitions.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = definitions.len(), "Rendering footnotes");
        self.push(Construct::Footnotes, 0..0);
        for (num, content) in &definitions {
            self.dispatch(Node::FootnoteDef { content, num: *num }, "")?;
        }
        self.close()
    }
}

/// A text event whose source is an entity reference rather than literal text.
fn is_entity(raw: &str, decoded: &str) -> bool {
    raw.len() > 2 && raw.starts_with('&') && raw.ends_with(';') && raw != decoded
}
