//! The renderer contract.
//!
//! A [`Renderer`] supplies one method per [`NodeKind`](crate::NodeKind).
//! Every method has a default implementation returning `None`, so an
//! implementation overrides only the constructs it cares about and the rest
//! follow their registry fallback:
//!
//! - block-level kinds vanish from the output,
//! - span-level kinds are replaced by their markdown source,
//! - low-level kinds copy their text through unchanged,
//! - document-level kinds add nothing.
//!
//! Returning `Some(String::new())` is not the same as returning `None`: it
//! produces empty output and suppresses the fallback.
//!
//! # Example
//!
//! ```
//! use quill_render::{Extensions, Renderer, render};
//!
//! struct Shouty;
//!
//! impl Renderer for Shouty {
//!     fn paragraph(&mut self, content: &str) -> Option<String> {
//!         Some(format!("{content}\n"))
//!     }
//!
//!     fn emphasis(&mut self, content: &str) -> Option<String> {
//!         Some(content.to_uppercase())
//!     }
//! }
//!
//! let out = render("some *loud* words", Extensions::empty(), &mut Shouty).unwrap();
//! assert_eq!(out, "some LOUD words\n");
//! ```

use bitflags::bitflags;

bitflags! {
    /// Structural flags passed to `list` and `listitem`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListFlags: u8 {
        /// Numbered list.
        const ORDERED = 0b01;
        /// Items hold block content (a loose list).
        const BLOCK   = 0b10;
    }
}

bitflags! {
    /// Flags passed to `table_cell`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TableFlags: u8 {
        /// Column is left aligned.
        const ALIGN_LEFT   = 0b001;
        /// Column is right aligned.
        const ALIGN_RIGHT  = 0b010;
        /// Column is centered.
        const ALIGN_CENTER = Self::ALIGN_LEFT.bits() | Self::ALIGN_RIGHT.bits();
        /// Cell is part of the header row.
        const HEADER       = 0b100;
    }
}

impl TableFlags {
    /// Mask covering the alignment bits.
    pub const ALIGN_MASK: Self = Self::ALIGN_CENTER;

    /// Alignment bits only.
    #[must_use]
    pub fn alignment(self) -> Self {
        self & Self::ALIGN_MASK
    }
}

/// Kind of automatic link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutolinkType {
    /// URL, either `<https://...>` or a bare URL in text.
    Normal,
    /// E-mail address in angle brackets; the link has no `mailto:` prefix.
    Email,
}

/// Per-construct rendering callbacks.
///
/// Arguments are borrowed for the duration of the call only. Methods return
/// their output instead of writing it anywhere; the dispatcher appends it.
#[allow(unused_variables)]
pub trait Renderer {
    // Block-level: `None` omits the construct.

    /// Fenced or indented code block. `lang` is empty when none was given.
    fn blockcode(&mut self, text: &str, lang: &str) -> Option<String> {
        None
    }

    fn blockquote(&mut self, content: &str) -> Option<String> {
        None
    }

    /// ATX or setext heading, `level` in 1..=6.
    fn header(&mut self, content: &str, level: u8) -> Option<String> {
        None
    }

    fn hrule(&mut self) -> Option<String> {
        None
    }

    fn list(&mut self, content: &str, flags: ListFlags) -> Option<String> {
        None
    }

    fn listitem(&mut self, content: &str, flags: ListFlags) -> Option<String> {
        None
    }

    fn paragraph(&mut self, content: &str) -> Option<String> {
        None
    }

    fn table(&mut self, content: &str) -> Option<String> {
        None
    }

    fn table_header(&mut self, content: &str) -> Option<String> {
        None
    }

    fn table_body(&mut self, content: &str) -> Option<String> {
        None
    }

    fn table_row(&mut self, content: &str) -> Option<String> {
        None
    }

    fn table_cell(&mut self, content: &str, flags: TableFlags) -> Option<String> {
        None
    }

    /// Container for all footnote definitions, emitted once at the end of the document.
    fn footnotes(&mut self, content: &str) -> Option<String> {
        None
    }

    /// One footnote definition; `num` is its 1-based ordinal.
    fn footnote_def(&mut self, content: &str, num: u32) -> Option<String> {
        None
    }

    fn blockhtml(&mut self, text: &str) -> Option<String> {
        None
    }

    // Span-level: `None` copies the markdown source verbatim.

    fn autolink(&mut self, link: &str, kind: AutolinkType) -> Option<String> {
        None
    }

    fn codespan(&mut self, text: &str) -> Option<String> {
        None
    }

    fn double_emphasis(&mut self, content: &str) -> Option<String> {
        None
    }

    fn emphasis(&mut self, content: &str) -> Option<String> {
        None
    }

    fn underline(&mut self, content: &str) -> Option<String> {
        None
    }

    fn highlight(&mut self, content: &str) -> Option<String> {
        None
    }

    fn quote(&mut self, content: &str) -> Option<String> {
        None
    }

    /// Image; `alt` is the plain text of the image description.
    fn image(&mut self, link: &str, title: &str, alt: &str) -> Option<String> {
        None
    }

    fn linebreak(&mut self) -> Option<String> {
        None
    }

    fn link(&mut self, content: &str, link: &str, title: &str) -> Option<String> {
        None
    }

    fn triple_emphasis(&mut self, content: &str) -> Option<String> {
        None
    }

    fn strikethrough(&mut self, content: &str) -> Option<String> {
        None
    }

    fn superscript(&mut self, content: &str) -> Option<String> {
        None
    }

    fn footnote_ref(&mut self, num: u32) -> Option<String> {
        None
    }

    /// Inline (`$x$`) or display (`$$x$$`) math.
    fn math(&mut self, text: &str, display_mode: bool) -> Option<String> {
        None
    }

    fn raw_html(&mut self, text: &str) -> Option<String> {
        None
    }

    // Low-level: `None` copies the text through.

    /// Entity reference exactly as written, e.g. `&copy;`.
    fn entity(&mut self, text: &str) -> Option<String> {
        None
    }

    fn normal_text(&mut self, text: &str) -> Option<String> {
        None
    }

    // Document-level: `None` adds nothing.

    fn doc_header(&mut self, inline_render: bool) -> Option<String> {
        None
    }

    fn doc_footer(&mut self, inline_render: bool) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;

    impl Renderer for Nothing {}

    #[test]
    fn test_defaults_defer() {
        let mut r = Nothing;
        assert_eq!(r.paragraph("x"), None);
        assert_eq!(r.emphasis("x"), None);
        assert_eq!(r.normal_text("x"), None);
        assert_eq!(r.doc_header(false), None);
        assert_eq!(r.table_cell("x", TableFlags::HEADER), None);
    }

    #[test]
    fn test_table_alignment_mask() {
        let flags = TableFlags::ALIGN_CENTER | TableFlags::HEADER;
        assert_eq!(flags.alignment(), TableFlags::ALIGN_CENTER);
        assert!(flags.contains(TableFlags::ALIGN_LEFT));
        assert!(flags.contains(TableFlags::ALIGN_RIGHT));
        assert_eq!(TableFlags::HEADER.alignment(), TableFlags::empty());
    }

    #[test]
    fn test_list_flags_combine() {
        let flags = ListFlags::ORDERED | ListFlags::BLOCK;
        assert!(flags.contains(ListFlags::ORDERED));
        assert_eq!(flags.bits(), 0b11);
    }
}
