//! Emoji grid rendering.
//!
//! [`Renderer`] turns record lists into rows of interactive elements on a
//! [`Surface`]. It owns the element → record bindings for whatever is
//! currently rendered and tears them down before every re-render, so stale
//! elements can never be activated.
//!
//! Two layouts exist:
//!
//! - **Flat**: search results, no headers, wrapped at `row_capacity`.
//! - **Grouped**: one header per non-empty category ("Frequently Used"
//!   first), each followed by its wrapped grid. The caller is told where
//!   each header landed so it can register scroll sections.
//!
//! Activating an element publishes [`PanelEvent::SelectionMade`] through the
//! injected publisher, or opens a [`ToneSelector`] for tone-capable records.
//!
//! # Examples
//!
//! ```
//! use emoji_panel::dataset::Dataset;
//! use emoji_panel::event::{EventQueue, PanelEvent};
//! use emoji_panel::render::{CellCanvas, Renderer};
//!
//! let dataset = Dataset::fallback();
//! let events = EventQueue::new();
//! let mut renderer = Renderer::new(10, false, events.publisher());
//! let mut canvas = CellCanvas::new(CellCanvas::width_for(10), 8);
//!
//! renderer.render_flat(&mut canvas, dataset.iter());
//! let first = canvas.hit_test(1, 0).unwrap();
//! renderer.activate(first);
//!
//! assert!(matches!(events.pop(), Some(PanelEvent::SelectionMade(r)) if r.glyph == "😀"));
//! ```

mod canvas;
mod cell;
mod hitgrid;
mod surface;
mod tone_picker;

pub use canvas::{CellCanvas, LEFT_MARGIN, SLOT_WIDTH};
pub use cell::{CanvasCell, CellAttributes, CellContent};
pub use hitgrid::HitGrid;
pub use surface::{ElementId, HeaderElement, Surface};
pub use tone_picker::{ToneSelector, variant_record};

use std::collections::HashMap;

use tracing::debug;

use crate::dataset::{Category, EmojiRecord, collect_categories};
use crate::event::PanelEvent;
use crate::usage::UsageTracker;

/// Default number of items per grid row.
pub const DEFAULT_ROW_CAPACITY: usize = 10;

/// Result of activating an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// The record was selected and published.
    Selected(EmojiRecord),
    /// The tone selector opened for this base record.
    ToneSelectorOpened(EmojiRecord),
}

/// Keyboard focus movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMove {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug)]
struct Binding {
    record: EmojiRecord,
    row: u32,
    column: u32,
}

/// Renders record lists and dispatches element activation.
pub struct Renderer {
    row_capacity: usize,
    skin_tones: bool,
    publish: Box<dyn Fn(PanelEvent)>,
    bindings: HashMap<ElementId, Binding>,
    /// Items in layout order (row, then column).
    order: Vec<ElementId>,
    focus: Option<usize>,
    tone_selector: Option<ToneSelector>,
}

impl Renderer {
    /// Create a renderer with `row_capacity` items per row.
    ///
    /// `skin_tones` enables the tone selector for tone-capable records.
    pub fn new(row_capacity: usize, skin_tones: bool, publish: impl Fn(PanelEvent) + 'static) -> Self {
        Self {
            row_capacity: row_capacity.max(1),
            skin_tones,
            publish: Box::new(publish),
            bindings: HashMap::new(),
            order: Vec::new(),
            focus: None,
            tone_selector: None,
        }
    }

    #[must_use]
    pub fn row_capacity(&self) -> usize {
        self.row_capacity
    }

    pub fn set_skin_tones(&mut self, enabled: bool) {
        self.skin_tones = enabled;
        if !enabled {
            self.tone_selector = None;
        }
    }

    /// Number of interactive items currently rendered.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.order.len()
    }

    /// Record bound to `element`.
    #[must_use]
    pub fn record_for(&self, element: ElementId) -> Option<&EmojiRecord> {
        self.bindings.get(&element).map(|b| &b.record)
    }

    /// Items in layout order.
    #[must_use]
    pub fn items(&self) -> &[ElementId] {
        &self.order
    }

    /// Release all bindings and clear the surface.
    pub fn teardown<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();
        self.bindings.clear();
        self.order.clear();
        self.focus = None;
        self.tone_selector = None;
    }

    /// Render `records` as a flat grid without headers.
    ///
    /// Returns the number of items rendered.
    pub fn render_flat<'a, S, I>(&mut self, surface: &mut S, records: I) -> usize
    where
        S: Surface + ?Sized,
        I: IntoIterator<Item = &'a EmojiRecord>,
    {
        self.teardown(surface);
        self.emit_grid(surface, 0, records);
        debug!(items = self.order.len(), "rendered flat view");
        self.order.len()
    }

    /// Render `records` grouped by category.
    ///
    /// "Frequently Used" is sourced from `tracker` (top `frequent_limit`).
    /// Empty categories are skipped. `on_section` is called once per rendered
    /// category with its header element. Returns the rendered categories in
    /// display order.
    pub fn render_grouped<S, F>(
        &mut self,
        surface: &mut S,
        records: &[EmojiRecord],
        tracker: &UsageTracker,
        frequent_limit: usize,
        mut on_section: F,
    ) -> Vec<Category>
    where
        S: Surface + ?Sized,
        F: FnMut(Category, HeaderElement),
    {
        self.teardown(surface);

        let frequent = tracker.frequently_used(records, frequent_limit);
        let mut buckets: Vec<Vec<&EmojiRecord>> = vec![Vec::new(); Category::ORDER.len()];
        buckets[Category::FrequentlyUsed as usize] = frequent.iter().collect();
        for record in records {
            let kind = record.category_kind();
            if !kind.is_frequently_used() {
                buckets[kind as usize].push(record);
            }
        }

        let mut rendered = Vec::new();
        let mut row = 0;
        for category in collect_categories(records) {
            let members = &buckets[category as usize];
            if members.is_empty() {
                continue;
            }
            let id = surface.header(row, category);
            on_section(category, HeaderElement { id, offset: row });
            row = self.emit_grid(surface, row + 1, members.iter().copied());
            rendered.push(category);
        }
        debug!(
            sections = rendered.len(),
            items = self.order.len(),
            "rendered grouped view"
        );
        rendered
    }

    /// Emit wrapped grid rows starting at `start_row`; returns the next free row.
    fn emit_grid<'a, S, I>(&mut self, surface: &mut S, start_row: u32, records: I) -> u32
    where
        S: Surface + ?Sized,
        I: IntoIterator<Item = &'a EmojiRecord>,
    {
        let capacity = u32::try_from(self.row_capacity).unwrap_or(u32::MAX);
        let mut row = start_row;
        let mut column = 0;
        for record in records {
            if column == capacity {
                row += 1;
                column = 0;
            }
            let id = surface.grid_item(row, column, record);
            self.bindings.insert(
                id,
                Binding {
                    record: record.clone(),
                    row,
                    column,
                },
            );
            self.order.push(id);
            column += 1;
        }
        if column > 0 { row + 1 } else { row }
    }

    /// Activate `element` (click or Enter).
    pub fn activate(&mut self, element: ElementId) -> Option<Activation> {
        let record = self.bindings.get(&element)?.record.clone();
        if self.skin_tones && record.supports_tone_variants {
            self.tone_selector = Some(ToneSelector::new(&record));
            (self.publish)(PanelEvent::ToneSelectorOpened(record.glyph.clone()));
            return Some(Activation::ToneSelectorOpened(record));
        }
        self.tone_selector = None;
        (self.publish)(PanelEvent::SelectionMade(record.clone()));
        Some(Activation::Selected(record))
    }

    /// Activate the keyboard-focused element.
    pub fn activate_focused(&mut self) -> Option<Activation> {
        let element = self.focused()?;
        self.activate(element)
    }

    /// The open tone selector.
    #[must_use]
    pub fn tone_selector(&self) -> Option<&ToneSelector> {
        self.tone_selector.as_ref()
    }

    /// Choose option `index` of the open tone selector and publish it.
    pub fn choose_tone(&mut self, index: usize) -> Option<EmojiRecord> {
        let record = self.tone_selector.as_ref()?.option(index)?.clone();
        self.tone_selector = None;
        (self.publish)(PanelEvent::SelectionMade(record.clone()));
        Some(record)
    }

    /// Close the tone selector without choosing. Returns whether one was open.
    pub fn dismiss_tone_selector(&mut self) -> bool {
        self.tone_selector.take().is_some()
    }

    /// Keyboard-focused element.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focus.and_then(|i| self.order.get(i).copied())
    }

    /// Move keyboard focus and scroll it into view.
    pub fn move_focus<S: Surface + ?Sized>(&mut self, surface: &mut S, direction: FocusMove) -> Option<ElementId> {
        if self.order.is_empty() {
            return None;
        }
        let next = match self.focus {
            None => 0,
            Some(current) => self.neighbor(current, direction),
        };
        self.focus = Some(next);
        let element = self.order[next];
        surface.set_focus(Some(element));

        if let Some(binding) = self.bindings.get(&element) {
            let top = surface.scroll_offset();
            let visible = surface.viewport_rows();
            if binding.row < top {
                surface.scroll_to(binding.row);
            } else if binding.row >= top + visible {
                surface.scroll_to(binding.row + 1 - visible);
            }
        }
        Some(element)
    }

    fn position(&self, index: usize) -> (u32, u32) {
        let b = &self.bindings[&self.order[index]];
        (b.row, b.column)
    }

    fn neighbor(&self, current: usize, direction: FocusMove) -> usize {
        let last = self.order.len() - 1;
        let (row, column) = self.position(current);
        match direction {
            FocusMove::Left => current.saturating_sub(1),
            FocusMove::Right => (current + 1).min(last),
            FocusMove::Down => {
                let Some(target_row) = (current..=last)
                    .map(|i| self.position(i).0)
                    .find(|&r| r > row)
                else {
                    return current;
                };
                self.closest_in_row(target_row, column)
            }
            FocusMove::Up => {
                let Some(target_row) = (0..current)
                    .rev()
                    .map(|i| self.position(i).0)
                    .find(|&r| r < row)
                else {
                    return current;
                };
                self.closest_in_row(target_row, column)
            }
        }
    }

    /// Index of the item in `row` with the largest column not past `column`.
    fn closest_in_row(&self, row: u32, column: u32) -> usize {
        let mut best = None;
        for (i, _) in self.order.iter().enumerate() {
            let (r, c) = self.position(i);
            if r == row {
                if best.is_none() || c <= column {
                    best = Some(i);
                }
                if c >= column {
                    break;
                }
            }
        }
        best.unwrap_or(0)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("row_capacity", &self.row_capacity)
            .field("skin_tones", &self.skin_tones)
            .field("items", &self.order.len())
            .field("focus", &self.focus)
            .field("tone_selector_open", &self.tone_selector.is_some())
            .finish_non_exhaustive()
    }
}
