//! Terminal cell canvas implementing [`Surface`].
//!
//! The canvas keeps the full scrollable content as rows of [`CanvasCell`]s
//! plus a [`HitGrid`] for mouse picking, and exposes a fixed-height viewport
//! over it. Grid items are laid out in fixed-width slots so every row lines
//! up regardless of the glyph's reported width.
//!
//! ```text
//!  Smileys & Emotion      <- header row (bold)
//!  😀 😂 🙂 😉 ...         <- grid row, 3 columns per slot
//! ```

use super::cell::{CanvasCell, CellAttributes};
use super::hitgrid::HitGrid;
use super::surface::{ElementId, Surface};
use crate::dataset::glyph::glyph_width;
use crate::dataset::{Category, EmojiRecord};
use crate::sync::TabState;

/// Columns reserved for each grid item (glyph plus gap).
pub const SLOT_WIDTH: u32 = 3;

/// Left margin before the first slot.
pub const LEFT_MARGIN: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
enum CanvasElement {
    Header { row: u32, category: Category },
    Item { row: u32, column: u32, glyph: String },
}

/// A row-addressed character canvas with a scrolling viewport.
#[derive(Clone, Debug)]
pub struct CellCanvas {
    width: u32,
    viewport_rows: u32,
    rows: Vec<Vec<CanvasCell>>,
    hits: HitGrid,
    elements: Vec<CanvasElement>,
    generation: u32,
    scroll: u32,
    focus: Option<ElementId>,
}

impl CellCanvas {
    /// Canvas `width` columns wide showing `viewport_rows` rows at a time.
    ///
    /// Zero dimensions are clamped to 1.
    #[must_use]
    pub fn new(width: u32, viewport_rows: u32) -> Self {
        let width = width.max(1);
        Self {
            width,
            viewport_rows: viewport_rows.max(1),
            rows: Vec::new(),
            hits: HitGrid::new(width, 0),
            elements: Vec::new(),
            generation: 0,
            scroll: 0,
            focus: None,
        }
    }

    /// Width needed to fit `row_capacity` slots, saturating at `u32::MAX`.
    #[must_use]
    pub fn width_for(row_capacity: usize) -> u32 {
        let slots = u32::try_from(row_capacity).unwrap_or(u32::MAX);
        SLOT_WIDTH.saturating_mul(slots).saturating_add(LEFT_MARGIN)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Change the canvas size. Content is cleared; callers re-render.
    pub fn resize(&mut self, width: u32, viewport_rows: u32) {
        self.width = width.max(1);
        self.viewport_rows = viewport_rows.max(1);
        self.hits.resize(self.width);
        self.clear();
    }

    /// Number of live elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Glyph rendered by an item element.
    #[must_use]
    pub fn glyph_of(&self, id: ElementId) -> Option<&str> {
        match self.element(id)? {
            CanvasElement::Item { glyph, .. } => Some(glyph.as_str()),
            CanvasElement::Header { .. } => None,
        }
    }

    /// Content row an element sits on.
    #[must_use]
    pub fn row_of(&self, id: ElementId) -> Option<u32> {
        match self.element(id)? {
            CanvasElement::Item { row, .. } | CanvasElement::Header { row, .. } => Some(*row),
        }
    }

    /// Category of a header element.
    #[must_use]
    pub fn header_category(&self, id: ElementId) -> Option<Category> {
        match self.element(id)? {
            CanvasElement::Header { category, .. } => Some(*category),
            CanvasElement::Item { .. } => None,
        }
    }

    /// Cell at content position.
    #[must_use]
    pub fn cell(&self, x: u32, row: u32) -> Option<&CanvasCell> {
        self.rows.get(row as usize)?.get(x as usize)
    }

    /// Element under viewport position (`x`, `y`).
    #[must_use]
    pub fn hit_test(&self, x: u32, y: u32) -> Option<ElementId> {
        if y >= self.viewport_rows {
            return None;
        }
        self.hits.test(x, y.saturating_add(self.scroll))
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> u32 {
        self.content_rows().saturating_sub(self.viewport_rows)
    }

    /// Text of one content row, trailing blanks trimmed.
    #[must_use]
    pub fn line(&self, row: u32) -> String {
        let Some(cells) = self.rows.get(row as usize) else {
            return String::new();
        };
        let mut out = String::new();
        for cell in cells {
            cell.write_to(&mut out);
        }
        out.trim_end().to_string()
    }

    /// Text of the rows currently inside the viewport.
    #[must_use]
    pub fn viewport_lines(&self) -> Vec<String> {
        let end = self
            .scroll
            .saturating_add(self.viewport_rows)
            .min(self.content_rows());
        (self.scroll..end).map(|row| self.line(row)).collect()
    }

    /// Render the category tab strip; the active tab is bracketed.
    #[must_use]
    pub fn tab_strip(tabs: &[TabState]) -> String {
        tabs.iter()
            .map(|tab| {
                if tab.active {
                    format!("[{}]", tab.category.icon())
                } else {
                    format!(" {} ", tab.category.icon())
                }
            })
            .collect()
    }

    /// Render the empty-state hint shown when a search has no results.
    pub fn hint(&mut self, row: u32, text: &str) {
        self.put_text(LEFT_MARGIN, row, text, CellAttributes::DIM);
    }

    fn ensure_row(&mut self, row: u32) -> &mut Vec<CanvasCell> {
        let row = row as usize;
        if self.rows.len() <= row {
            self.rows
                .resize_with(row + 1, || vec![CanvasCell::default(); self.width as usize]);
        }
        &mut self.rows[row]
    }

    fn put_text(&mut self, x: u32, row: u32, text: &str, attributes: CellAttributes) {
        let width = self.width as usize;
        let cells = self.ensure_row(row);
        let mut col = x as usize;
        for g in crate::dataset::glyph::graphemes(text) {
            let w = glyph_width(g).max(1);
            if col + w > width {
                break;
            }
            cells[col] = CanvasCell::text(g, attributes);
            for cont in &mut cells[col + 1..col + w] {
                *cont = CanvasCell::continuation(attributes);
            }
            col += w;
        }
        self.hits.grow_to(row + 1);
    }

    fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        if id.generation() != self.generation {
            return None;
        }
        self.elements.get(id.index() as usize)
    }

    fn push_element(&mut self, element: CanvasElement) -> ElementId {
        let index = u32::try_from(self.elements.len()).unwrap_or(u32::MAX);
        self.elements.push(element);
        ElementId::new(self.generation, index)
    }

    fn restyle(&mut self, id: ElementId, add: bool) {
        let Some(CanvasElement::Item { row, column, .. }) = self.element(id).cloned() else {
            return;
        };
        let x = (LEFT_MARGIN + column * SLOT_WIDTH) as usize;
        if let Some(cells) = self.rows.get_mut(row as usize) {
            let end = (x + SLOT_WIDTH as usize - 1).min(cells.len());
            for cell in &mut cells[x.min(end)..end] {
                cell.attributes.set(CellAttributes::UNDERLINE, add);
            }
        }
    }
}

impl Surface for CellCanvas {
    fn clear(&mut self) {
        self.rows.clear();
        self.hits.clear();
        self.elements.clear();
        self.generation = self.generation.wrapping_add(1);
        self.scroll = 0;
        self.focus = None;
    }

    fn header(&mut self, row: u32, category: Category) -> ElementId {
        self.put_text(LEFT_MARGIN, row, category.name(), CellAttributes::BOLD);
        self.push_element(CanvasElement::Header { row, category })
    }

    fn grid_item(&mut self, row: u32, column: u32, record: &EmojiRecord) -> ElementId {
        let x = LEFT_MARGIN + column * SLOT_WIDTH;
        self.put_text(x, row, &record.glyph, CellAttributes::empty());
        let id = self.push_element(CanvasElement::Item {
            row,
            column,
            glyph: record.glyph.clone(),
        });
        self.hits.register(x, row, SLOT_WIDTH - 1, 1, id);
        id
    }

    fn set_focus(&mut self, element: Option<ElementId>) {
        if let Some(old) = self.focus.take() {
            self.restyle(old, false);
        }
        if let Some(new) = element {
            self.restyle(new, true);
            self.focus = Some(new);
        }
    }

    fn scroll_to(&mut self, offset: u32) {
        self.scroll = offset.min(self.max_scroll());
    }

    fn scroll_offset(&self) -> u32 {
        self.scroll
    }

    fn content_rows(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    fn viewport_rows(&self) -> u32 {
        self.viewport_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_with_rows(n: u32) -> CellCanvas {
        let mut canvas = CellCanvas::new(CellCanvas::width_for(4), 3);
        for row in 0..n {
            canvas.grid_item(row, 0, &EmojiRecord::new("⭐", "star", "Symbols"));
        }
        canvas
    }

    #[test]
    fn test_width_for_saturates() {
        assert_eq!(CellCanvas::width_for(10), 31);
        assert_eq!(CellCanvas::width_for(usize::MAX), u32::MAX);
        assert_eq!(CellCanvas::width_for((u32::MAX / SLOT_WIDTH) as usize), u32::MAX);
    }

    #[test]
    fn test_header_and_items_layout() {
        let mut canvas = CellCanvas::new(CellCanvas::width_for(4), 5);
        let header = canvas.header(0, Category::Symbols);
        let a = canvas.grid_item(1, 0, &EmojiRecord::new("❤️", "red heart", "Symbols"));
        let b = canvas.grid_item(1, 1, &EmojiRecord::new("💯", "hundred points", "Symbols"));

        assert_eq!(canvas.line(0), " Symbols");
        assert_eq!(canvas.line(1), " ❤️ 💯");
        assert_eq!(canvas.header_category(header), Some(Category::Symbols));
        assert_eq!(canvas.glyph_of(a), Some("❤️"));
        assert_eq!(canvas.row_of(b), Some(1));
        assert!(canvas.cell(1, 0).unwrap().attributes.contains(CellAttributes::BOLD));
    }

    #[test]
    fn test_hit_test_follows_scroll() {
        let mut canvas = canvas_with_rows(10);
        let top = canvas.hit_test(1, 0);
        assert_eq!(top.and_then(|id| canvas.row_of(id)), Some(0));

        canvas.scroll_to(4);
        let id = canvas.hit_test(2, 1).unwrap();
        assert_eq!(canvas.row_of(id), Some(5));
        assert_eq!(canvas.hit_test(3, 1), None); // gap column
        assert_eq!(canvas.hit_test(1, 3), None); // below viewport
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut canvas = canvas_with_rows(10);
        canvas.scroll_to(100);
        assert_eq!(canvas.scroll_offset(), 7);
        assert_eq!(canvas.viewport_lines().len(), 3);
    }

    #[test]
    fn test_clear_releases_elements() {
        let mut canvas = canvas_with_rows(4);
        canvas.scroll_to(1);
        canvas.clear();
        assert_eq!(canvas.element_count(), 0);
        assert_eq!(canvas.content_rows(), 0);
        assert_eq!(canvas.scroll_offset(), 0);
        assert_eq!(canvas.hit_test(1, 0), None);
    }

    #[test]
    fn test_ids_from_before_clear_are_stale() {
        let mut canvas = canvas_with_rows(1);
        let old = canvas.hit_test(1, 0).unwrap();
        canvas.clear();
        let star = EmojiRecord::new("⭐", "star", "Symbols");
        let new = canvas.grid_item(0, 0, &star);

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert_eq!(canvas.glyph_of(old), None);
        assert_eq!(canvas.glyph_of(new), Some("⭐"));
    }

    #[test]
    fn test_focus_underlines_slot() {
        let mut canvas = canvas_with_rows(2);
        let first = canvas.hit_test(1, 0).unwrap();
        let second = canvas.hit_test(1, 1).unwrap();
        canvas.set_focus(Some(first));
        assert!(canvas.cell(1, 0).unwrap().attributes.contains(CellAttributes::UNDERLINE));
        canvas.set_focus(Some(second));
        assert!(!canvas.cell(1, 0).unwrap().attributes.contains(CellAttributes::UNDERLINE));
        assert!(canvas.cell(1, 1).unwrap().attributes.contains(CellAttributes::UNDERLINE));
    }

    #[test]
    fn test_tab_strip_brackets_active() {
        let tabs = [
            TabState {
                category: Category::SmileysEmotion,
                active: false,
            },
            TabState {
                category: Category::Symbols,
                active: true,
            },
        ];
        assert_eq!(CellCanvas::tab_strip(&tabs), " 😀 [🔣]");
    }

    #[test]
    fn test_long_header_is_clipped() {
        let mut canvas = CellCanvas::new(8, 2);
        canvas.header(0, Category::SmileysEmotion);
        assert_eq!(canvas.line(0), " Smileys");
    }
}
