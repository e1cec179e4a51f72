//! Hit testing grid mapping canvas positions to rendered elements.

use super::surface::ElementId;

/// A grid of content cells, each optionally owned by an element.
///
/// The grid covers the whole scrollable content, not just the viewport, and
/// grows downward as rows are rendered.
#[derive(Clone, Debug)]
pub struct HitGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<ElementId>>,
}

impl HitGrid {
    /// An empty grid `width` columns wide with `height` rows reserved.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            cells: vec![None; size],
        }
    }

    #[inline]
    fn cell_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row_offset = (y as usize).checked_mul(self.width as usize)?;
        let idx = row_offset.checked_add(x as usize)?;
        (idx < self.cells.len()).then_some(idx)
    }

    /// Clear all hit areas and shrink to zero rows.
    pub fn clear(&mut self) {
        self.height = 0;
        self.cells.clear();
    }

    /// Grow to at least `height` rows, keeping existing areas.
    pub fn grow_to(&mut self, height: u32) {
        if height <= self.height {
            return;
        }
        self.height = height;
        let size = (self.width as usize).saturating_mul(height as usize);
        self.cells.resize(size, None);
    }

    /// Register a hit area, growing the grid if it extends below the last row.
    ///
    /// Columns beyond the grid width are clipped.
    pub fn register(&mut self, x: u32, y: u32, width: u32, height: u32, id: ElementId) {
        self.grow_to(y.saturating_add(height));
        for row in y..y.saturating_add(height).min(self.height) {
            for col in x..x.saturating_add(width).min(self.width) {
                if let Some(idx) = self.cell_index(col, row) {
                    self.cells[idx] = Some(id);
                }
            }
        }
    }

    /// Which element is at a content position.
    #[must_use]
    pub fn test(&self, x: u32, y: u32) -> Option<ElementId> {
        self.cell_index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Change the width, clearing all hit areas.
    pub fn resize(&mut self, width: u32) {
        self.width = width;
        self.clear();
    }

    /// `(columns, rows)` currently covered.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
