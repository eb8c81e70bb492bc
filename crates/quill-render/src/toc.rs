//! Table-of-contents renderer.
//!
//! Emits only the headings of a document, as nested `<ul>` lists linking to
//! the `toc_N` anchors that [`HtmlRenderer::with_toc_level`] produces.

use std::fmt::Write;

use crate::html::{HtmlFlags, HtmlRenderer};
use crate::renderer::{AutolinkType, Renderer};

/// One heading collected by [`TocRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level as written, 1-6.
    pub level: u8,
    /// Heading content rendered as inline HTML.
    pub title: String,
    /// Anchor id, `toc_N`.
    pub anchor: String,
}

/// Renders a nested list of links to a document's headings.
///
/// Levels are relative to the first heading, so a document starting at `##`
/// still produces a single top-level list. Pair it with an [`HtmlRenderer`]
/// using the same `nesting_level` as its TOC level so the anchors line up.
///
/// ```
/// use quill_render::{Extensions, TocRenderer, render};
///
/// let mut toc = TocRenderer::new(6);
/// let out = render("# A\n## B\n", Extensions::empty(), &mut toc).unwrap();
/// assert_eq!(
///     out,
///     "<ul>\n<li>\n<a href=\"#toc_0\">A</a>\n<ul>\n<li>\n<a href=\"#toc_1\">B</a>\n</li>\n</ul>\n</li>\n</ul>\n"
/// );
/// assert_eq!(toc.entries().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct TocRenderer {
    nesting_level: u8,
    inline: HtmlRenderer,
    entries: Vec<TocEntry>,
}

impl TocRenderer {
    /// Include headings up to and including `nesting_level`.
    #[must_use]
    pub fn new(nesting_level: u8) -> Self {
        Self::with_flags(nesting_level, HtmlFlags::empty())
    }

    /// Like [`TocRenderer::new`], with flags for the inline HTML in titles.
    #[must_use]
    pub fn with_flags(nesting_level: u8, flags: HtmlFlags) -> Self {
        Self {
            nesting_level,
            inline: HtmlRenderer::new(flags),
            entries: Vec::new(),
        }
    }

    /// Headings collected during the last render pass.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }
}

/// Nested `<ul>` lists for `entries`, levels relative to the first entry.
fn build_list(entries: &[TocEntry]) -> String {
    let Some(first) = entries.first() else {
        return String::new();
    };
    let offset = first.level.saturating_sub(1);
    let mut current = 0u8;
    let mut out = String::new();

    for entry in entries {
        let relative = entry.level.saturating_sub(offset).max(1);
        if relative > current {
            while relative > current {
                out.push_str("<ul>\n<li>\n");
                current += 1;
            }
        } else {
            while current > relative {
                out.push_str("</li>\n</ul>\n");
                current -= 1;
            }
            out.push_str("</li>\n<li>\n");
        }
        let _ = writeln!(out, "<a href=\"#{}\">{}</a>", entry.anchor, entry.title);
    }
    while current > 0 {
        out.push_str("</li>\n</ul>\n");
        current -= 1;
    }
    out
}

impl Default for TocRenderer {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Renderer for TocRenderer {
    // Headings may sit inside containers that this renderer omits, so the
    // list is assembled from the collected entries at the end of the pass.
    fn header(&mut self, content: &str, level: u8) -> Option<String> {
        if level > self.nesting_level {
            return None;
        }
        self.entries.push(TocEntry {
            level,
            title: content.to_owned(),
            anchor: format!("toc_{}", self.entries.len()),
        });
        Some(String::new())
    }

    fn codespan(&mut self, text: &str) -> Option<String> {
        self.inline.codespan(text)
    }

    fn double_emphasis(&mut self, content: &str) -> Option<String> {
        self.inline.double_emphasis(content)
    }

    fn emphasis(&mut self, content: &str) -> Option<String> {
        self.inline.emphasis(content)
    }

    fn underline(&mut self, content: &str) -> Option<String> {
        self.inline.underline(content)
    }

    fn highlight(&mut self, content: &str) -> Option<String> {
        self.inline.highlight(content)
    }

    fn quote(&mut self, content: &str) -> Option<String> {
        self.inline.quote(content)
    }

    fn triple_emphasis(&mut self, content: &str) -> Option<String> {
        self.inline.triple_emphasis(content)
    }

    fn strikethrough(&mut self, content: &str) -> Option<String> {
        self.inline.strikethrough(content)
    }

    fn superscript(&mut self, content: &str) -> Option<String> {
        self.inline.superscript(content)
    }

    fn math(&mut self, text: &str, display_mode: bool) -> Option<String> {
        self.inline.math(text, display_mode)
    }

    fn raw_html(&mut self, text: &str) -> Option<String> {
        self.inline.raw_html(text)
    }

    // Links inside a heading would nest anchors; keep just their text.
    fn link(&mut self, content: &str, _link: &str, _title: &str) -> Option<String> {
        Some(content.to_owned())
    }

    fn autolink(&mut self, link: &str, _kind: AutolinkType) -> Option<String> {
        self.inline.normal_text(link)
    }

    fn entity(&mut self, text: &str) -> Option<String> {
        self.inline.entity(text)
    }

    fn normal_text(&mut self, text: &str) -> Option<String> {
        self.inline.normal_text(text)
    }

    fn doc_header(&mut self, _inline_render: bool) -> Option<String> {
        self.entries.clear();
        None
    }

    fn doc_footer(&mut self, _inline_render: bool) -> Option<String> {
        let out = build_list(&self.entries);
        if out.is_empty() { None } else { Some(out) }
    }
}
