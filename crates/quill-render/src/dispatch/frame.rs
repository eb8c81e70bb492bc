//! Open-construct bookkeeping for the dispatcher.

use std::collections::HashMap;
use std::ops::Range;

use pulldown_cmark::Alignment;

use super::scan::Delimiter;
use crate::buffer::OutputBuffer;
use crate::renderer::{AutolinkType, ListFlags, TableFlags};

/// A construct whose end event has not arrived yet.
pub(super) struct Frame {
    pub(super) construct: Construct,
    /// Rendered children, or raw text for constructs that collect it.
    pub(super) content: OutputBuffer,
    /// Source range of the whole construct, delimiters included.
    pub(super) range: Range<usize>,
    /// Opened past the nesting ceiling: content passes through without a callback.
    pub(super) flattened: bool,
}

pub(super) enum Construct {
    Paragraph,
    Header(u8),
    BlockQuote,
    BlockCode { lang: String },
    BlockHtml,
    List(ListFlags),
    ListItem(ListFlags),
    Table(TableState),
    TableHeader,
    TableBody,
    TableRow,
    TableCell(TableFlags),
    Footnotes,
    FootnoteDef(String),
    Emphasis { underline: bool, triple: bool },
    Strong { triple: bool },
    Strikethrough,
    Superscript,
    Link {
        dest: String,
        title: String,
        autolink: Option<AutolinkType>,
    },
    Image { dest: String, title: String },
    /// Highlight or quote whose opening delimiter was seen in a text run.
    /// Becomes literal text again if its parent ends before a closer.
    Delimited(Delimiter),
    /// No callback of its own; content goes straight to the parent.
    Transparent,
}

impl Construct {
    /// Whether text inside is collected verbatim instead of dispatched.
    pub(super) fn collects_raw(&self) -> bool {
        matches!(
            self,
            Self::BlockCode { .. } | Self::BlockHtml | Self::Image { .. }
        )
    }

    /// Whether the nesting ceiling applies.
    pub(super) fn counts_toward_nesting(&self) -> bool {
        !matches!(self, Self::Transparent | Self::FootnoteDef(_) | Self::Footnotes)
    }
}

/// Column state of the innermost open table.
pub(super) struct TableState {
    alignments: Vec<Alignment>,
    pub(super) in_head: bool,
    pub(super) body_open: bool,
    pub(super) cell: usize,
}

impl TableState {
    pub(super) fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            in_head: false,
            body_open: false,
            cell: 0,
        }
    }

    /// Flags for the cell at the current column.
    pub(super) fn cell_flags(&self) -> TableFlags {
        let mut flags = match self.alignments.get(self.cell) {
            Some(Alignment::Left) => TableFlags::ALIGN_LEFT,
            Some(Alignment::Right) => TableFlags::ALIGN_RIGHT,
            Some(Alignment::Center) => TableFlags::ALIGN_CENTER,
            Some(Alignment::None) | None => TableFlags::empty(),
        };
        if self.in_head {
            flags |= TableFlags::HEADER;
        }
        flags
    }
}

/// Footnote numbering and stashed definitions.
///
/// Ordinals follow the order of first reference, starting at 1. Labels match
/// case-insensitively.
#[derive(Default)]
pub(super) struct Footnotes {
    referenced: Vec<String>,
    numbers: HashMap<String, u32>,
    definitions: HashMap<String, String>,
}

impl Footnotes {
    /// Ordinal for a reference, assigning the next one on first use.
    pub(super) fn reference(&mut self, label: &str) -> u32 {
        let key = label.to_lowercase();
        if let Some(num) = self.numbers.get(&key) {
            return *num;
        }
        let num = u32::try_from(self.referenced.len() + 1).unwrap_or(u32::MAX);
        self.referenced.push(key.clone());
        self.numbers.insert(key, num);
        num
    }

    /// Stash a rendered definition. The first definition of a label wins.
    pub(super) fn define(&mut self, label: &str, content: String) {
        self.definitions
            .entry(label.to_lowercase())
            .or_insert(content);
    }

    /// Referenced definitions in ordinal order. Unreferenced ones are dropped.
    pub(super) fn take_referenced(&mut self) -> Vec<(u32, String)> {
        let referenced = std::mem::take(&mut self.referenced);
        let mut definitions = std::mem::take(&mut self.definitions);
        referenced
            .into_iter()
            .filter_map(|key| {
                let num = self.numbers.get(&key).copied()?;
                definitions.remove(&key).map(|content| (num, content))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_flags_alignment() {
        let mut table = TableState::new(vec![
            Alignment::None,
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
        ]);
        assert_eq!(table.cell_flags(), TableFlags::empty());
        table.cell = 1;
        assert_eq!(table.cell_flags(), TableFlags::ALIGN_LEFT);
        table.cell = 2;
        assert_eq!(table.cell_flags(), TableFlags::ALIGN_CENTER);
        table.cell = 3;
        assert_eq!(table.cell_flags(), TableFlags::ALIGN_RIGHT);
        table.cell = 9;
        assert_eq!(table.cell_flags(), TableFlags::empty());
    }

    #[test]
    fn test_cell_flags_header() {
        let mut table = TableState::new(vec![Alignment::Right]);
        table.in_head = true;
        assert_eq!(
            table.cell_flags(),
            TableFlags::ALIGN_RIGHT | TableFlags::HEADER
        );
    }

    #[test]
    fn test_footnote_numbers_follow_first_reference() {
        let mut notes = Footnotes::default();
        assert_eq!(notes.reference("b"), 1);
        assert_eq!(notes.reference("a"), 2);
        assert_eq!(notes.reference("B"), 1);
    }

    #[test]
    fn test_take_referenced_orders_and_drops() {
        let mut notes = Footnotes::default();
        notes.define("a", "A".to_owned());
        notes.define("unused", "U".to_owned());
        notes.define("b", "B".to_owned());
        notes.reference("b");
        notes.reference("a");
        notes.reference("missing");

        let defs = notes.take_referenced();
        assert_eq!(defs, vec![(1, "B".to_owned()), (2, "A".to_owned())]);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut notes = Footnotes::default();
        notes.define("x", "first".to_owned());
        notes.define("X", "second".to_owned());
        notes.reference("x");
        assert_eq!(notes.take_referenced(), vec![(1, "first".to_owned())]);
    }
}
