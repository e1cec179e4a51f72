//! Canvas cells and their display attributes.
//!
//! A glyph wider than one column occupies its first cell; the following
//! cells become [`CellContent::Continuation`] so column arithmetic stays
//! simple when rows are turned back into text.

use bitflags::bitflags;

bitflags! {
    /// Display attributes for a canvas cell.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct CellAttributes: u8 {
        /// Section headers.
        const BOLD      = 0x01;
        /// De-emphasized text (empty-state hints).
        const DIM       = 0x02;
        /// Keyboard focus.
        const UNDERLINE = 0x04;
        /// Active tab.
        const INVERSE   = 0x08;
    }
}

/// What a cell holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CellContent {
    #[default]
    Empty,
    /// A single character.
    Char(char),
    /// A grapheme cluster (emoji sequences).
    Grapheme(String),
    /// Occupied by the wide glyph to the left.
    Continuation,
}

/// One column of one content row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CanvasCell {
    pub content: CellContent,
    pub attributes: CellAttributes,
}

impl CanvasCell {
    /// Cell holding `text`, stored as a char when it is a single code point.
    #[must_use]
    pub fn text(text: &str, attributes: CellAttributes) -> Self {
        let mut chars = text.chars();
        let content = match (chars.next(), chars.next()) {
            (None, _) => CellContent::Empty,
            (Some(c), None) => CellContent::Char(c),
            _ => CellContent::Grapheme(text.to_string()),
        };
        Self {
            content,
            attributes,
        }
    }

    /// Continuation cell for a wide glyph.
    #[must_use]
    pub fn continuation(attributes: CellAttributes) -> Self {
        Self {
            content: CellContent::Continuation,
            attributes,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.content == CellContent::Continuation
    }

    /// Append this cell's visible text to `out`.
    pub fn write_to(&self, out: &mut String) {
        match &self.content {
            CellContent::Empty => out.push(' '),
            CellContent::Char(c) => out.push(*c),
            CellContent::Grapheme(g) => out.push_str(g),
            CellContent::Continuation => {}
        }
    }
}
