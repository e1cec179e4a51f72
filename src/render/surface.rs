//! The UI target interface the renderer draws through.
//!
//! Content is laid out in rows: a section header takes one row and each
//! grid row holds up to `row_capacity` items. Offsets used for scrolling and
//! section registration are row indices into the full scrollable content.

use crate::dataset::{Category, EmojiRecord};

/// Identifier of a rendered element.
///
/// Ids carry the surface generation they were issued in. Clearing a surface
/// starts a new generation, so an id from an earlier render never matches a
/// current element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId {
    generation: u32,
    index: u32,
}

impl ElementId {
    #[must_use]
    pub const fn new(generation: u32, index: u32) -> Self {
        Self { generation, index }
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Position in render order within its generation.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// A rendered section header and the content row it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderElement {
    pub id: ElementId,
    pub offset: u32,
}

/// One UI stack's implementation of the renderer primitives.
pub trait Surface {
    /// Release every rendered element and reset scrolling.
    fn clear(&mut self);

    /// Render a section header on content row `row`.
    fn header(&mut self, row: u32, category: Category) -> ElementId;

    /// Render an interactive grid item at (`row`, `column`).
    fn grid_item(&mut self, row: u32, column: u32, record: &EmojiRecord) -> ElementId;

    /// Mark `element` as keyboard-focused, or clear focus.
    fn set_focus(&mut self, element: Option<ElementId>);

    /// Scroll so that content row `offset` is at the top of the viewport.
    fn scroll_to(&mut self, offset: u32);

    /// Content row currently at the top of the viewport.
    fn scroll_offset(&self) -> u32;

    /// Total number of content rows rendered.
    fn content_rows(&self) -> u32;

    /// Number of rows visible at once.
    fn viewport_rows(&self) -> u32;
}
