//! Category controller wired to a rendered canvas.

mod common;

use std::time::Instant;

use common::{MS, sample_records};
use emoji_panel::render::DEFAULT_ROW_CAPACITY;
use emoji_panel::sync::ScrollSyncOptions;
use emoji_panel::{
    Category, CategoryController, CellCanvas, EventQueue, Renderer, Surface, UsageTracker,
};

struct Panel {
    renderer: Renderer,
    canvas: CellCanvas,
    controller: CategoryController,
}

impl Panel {
    fn new(viewport_rows: u32) -> Self {
        let events = EventQueue::new();
        Self {
            renderer: Renderer::new(DEFAULT_ROW_CAPACITY, true, events.publisher()),
            canvas: CellCanvas::new(CellCanvas::width_for(DEFAULT_ROW_CAPACITY), viewport_rows),
            controller: CategoryController::new(ScrollSyncOptions::default()),
        }
    }

    fn rebuild(&mut self, tracker: &UsageTracker) {
        let records = sample_records();
        let controller = &mut self.controller;
        controller.clear_sections();
        let rendered = self.renderer.render_grouped(&mut self.canvas, &records, tracker, 30, |c, h| {
            controller.register_section(c, h.offset);
        });
        self.controller.set_categories(rendered);
    }

    fn scroll(&mut self, offset: u32, now: Instant) -> Option<Category> {
        self.canvas.scroll_to(offset);
        self.controller.on_scroll(self.canvas.scroll_offset(), now)
    }
}

#[test]
fn exactly_one_tab_active_at_every_offset() {
    let mut panel = Panel::new(4);
    panel.rebuild(&UsageTracker::in_memory());
    let now = Instant::now();

    for offset in 0..=panel.canvas.max_scroll() {
        panel.scroll(offset, now);
        let active: Vec<_> = panel.controller.tabs().into_iter().filter(|t| t.active).collect();
        assert_eq!(active.len(), 1, "offset {offset}");
    }
}

#[test]
fn scrolling_down_walks_sections_in_order() {
    let mut panel = Panel::new(4);
    panel.rebuild(&UsageTracker::in_memory());
    let now = Instant::now();

    let mut seen = vec![panel.controller.active().unwrap()];
    for offset in 0..=panel.canvas.max_scroll() {
        if let Some(category) = panel.scroll(offset, now) {
            seen.push(category);
        }
    }
    assert_eq!(
        seen,
        vec![
            Category::SmileysEmotion,
            Category::PeopleBody,
            Category::AnimalsNature,
            Category::FoodDrink,
            Category::Symbols,
        ]
    );
}

#[test]
fn rebuild_reregisters_shifted_sections() {
    let mut panel = Panel::new(4);
    let mut tracker = UsageTracker::in_memory();
    panel.rebuild(&tracker);
    assert_eq!(panel.controller.section_offset(Category::Symbols), Some(8));
    assert_eq!(panel.controller.section_offset(Category::FrequentlyUsed), None);

    tracker.track_selection("🍕", Instant::now());
    panel.rebuild(&tracker);
    assert_eq!(panel.controller.section_offset(Category::FrequentlyUsed), Some(0));
    assert_eq!(panel.controller.section_offset(Category::Symbols), Some(10));
    assert_eq!(panel.controller.categories()[0], Category::FrequentlyUsed);

    let command = panel
        .controller
        .click_tab(Category::Symbols, Instant::now())
        .unwrap();
    assert_eq!(command.offset, 10);
}

#[test]
fn guard_window_suppresses_then_releases() {
    let mut panel = Panel::new(4);
    panel.rebuild(&UsageTracker::in_memory());
    let now = Instant::now();

    let command = panel.controller.click_tab(Category::FoodDrink, now).unwrap();
    panel.canvas.scroll_to(command.offset);
    assert_eq!(panel.canvas.scroll_offset(), 6);

    assert_eq!(panel.scroll(0, now + 149 * MS), None);
    assert_eq!(panel.controller.active(), Some(Category::FoodDrink));
    assert_eq!(panel.scroll(0, now + 150 * MS), Some(Category::SmileysEmotion));
}

#[test]
fn section_header_one_row_below_top_counts() {
    let mut panel = Panel::new(4);
    panel.rebuild(&UsageTracker::in_memory());
    let now = Instant::now();
    // People & Body header is on row 2
    assert_eq!(panel.scroll(1, now), Some(Category::PeopleBody));
    assert_eq!(panel.scroll(0, now), Some(Category::SmileysEmotion));
}
