//! Popup orchestration.
//!
//! A [`PopupSession`] is the explicit context that owns every panel
//! component for one picker instance: dataset, usage tracker, search
//! engine, category controller, renderer, canvas, event queue and
//! clipboard. Hosts feed it input (`type_query`, `click_tab`, `scroll_to`,
//! `click`, `key`) and call [`PopupSession::tick`] with the current time so
//! debounced work (search, scroll guard, usage writes, paste) can run.
//!
//! Everything observable is also published on the session's [`EventQueue`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::dataset::{Category, Dataset, EmojiRecord};
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::event::{EventQueue, PanelEvent};
use crate::render::{Activation, CellCanvas, ElementId, FocusMove, Renderer, Surface, ToneSelector};
use crate::search::SearchEngine;
use crate::settings::PanelSettings;
use crate::sync::{CategoryController, ScrollCommand, TabState};
use crate::usage::UsageTracker;

/// Hint rendered when a search matches nothing.
pub const EMPTY_RESULTS_HINT: &str = "No emoji found";

/// Host clipboard and paste mechanics.
pub trait Clipboard {
    /// Put `text` on the clipboard.
    fn copy(&mut self, text: &str) -> Result<()>;

    /// Paste the clipboard into the focused application.
    fn paste(&mut self) -> Result<()>;
}

/// Clipboard that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopClipboard;

impl Clipboard for NoopClipboard {
    fn copy(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn paste(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ClipboardLog {
    copies: Vec<String>,
    pastes: usize,
    fail_copy: bool,
    fail_paste: bool,
}

/// Clipboard that records operations; clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingClipboard {
    log: Rc<RefCell<ClipboardLog>>,
}

impl RecordingClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every copied text, oldest first.
    #[must_use]
    pub fn copies(&self) -> Vec<String> {
        self.log.borrow().copies.clone()
    }

    #[must_use]
    pub fn last_copy(&self) -> Option<String> {
        self.log.borrow().copies.last().cloned()
    }

    #[must_use]
    pub fn pastes(&self) -> usize {
        self.log.borrow().pastes
    }

    pub fn set_fail_copy(&self, fail: bool) {
        self.log.borrow_mut().fail_copy = fail;
    }

    pub fn set_fail_paste(&self, fail: bool) {
        self.log.borrow_mut().fail_paste = fail;
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_copy {
            return Err(Error::Clipboard("copy rejected".into()));
        }
        log.copies.push(text.to_string());
        Ok(())
    }

    fn paste(&mut self) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_paste {
            return Err(Error::Clipboard("paste rejected".into()));
        }
        log.pastes += 1;
        Ok(())
    }
}

/// Keys the panel reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKey {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    /// `1`..=`6` choose a tone while the tone selector is open.
    Digit(u8),
}

/// What the content area currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Category sections with headers.
    Grouped,
    /// Search results.
    Flat,
}

/// One open-able emoji picker instance.
pub struct PopupSession<C: Clipboard> {
    settings: PanelSettings,
    dataset: Dataset,
    tracker: UsageTracker,
    search: SearchEngine,
    controller: CategoryController,
    renderer: Renderer,
    canvas: CellCanvas,
    events: EventQueue,
    clipboard: C,
    paste: Debouncer<String>,
    view: ViewMode,
    result_count: usize,
    open: bool,
}

impl<C: Clipboard> PopupSession<C> {
    /// Assemble a closed session.
    pub fn new(settings: PanelSettings, dataset: Dataset, mut tracker: UsageTracker, clipboard: C) -> Self {
        let events = EventQueue::new();
        let layout = settings.layout();
        tracker.set_persist_delay(settings.persist_delay());
        let search = SearchEngine::new(dataset.records(), settings.search_debounce(), settings.max_results);
        let controller = CategoryController::new(settings.scroll_sync()).with_publisher(events.publisher());
        let renderer = Renderer::new(layout.row_capacity, settings.skin_tones, events.publisher());
        let canvas = CellCanvas::new(layout.width(), layout.viewport_rows);
        let paste = Debouncer::new(settings.paste_delay());
        Self {
            settings,
            dataset,
            tracker,
            search,
            controller,
            renderer,
            canvas,
            events,
            clipboard,
            paste,
            view: ViewMode::Grouped,
            result_count: 0,
            open: false,
        }
    }

    /// Show the popup: empty query, grouped view, scrolled to the top with
    /// the first tab active.
    pub fn open(&mut self, now: Instant) {
        self.open = true;
        let query = self.search.request_immediate("");
        self.apply_query(&query, now);
        self.canvas.scroll_to(0);
        self.controller.reset();
        info!(
            records = self.dataset.len(),
            tabs = self.controller.categories().len(),
            "popup opened"
        );
    }

    /// Hide the popup and release its rendered content.
    ///
    /// Pending search and scroll-guard timers are cancelled; a pending paste
    /// still runs on a later [`tick`](Self::tick).
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.search.cancel();
        self.controller.cancel_guard();
        self.renderer.teardown(&mut self.canvas);
        self.result_count = 0;
        self.tracker.flush();
        self.events.publish(PanelEvent::PopupClosed);
        info!("popup closed");
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Keystroke in the search entry; applied after the debounce delay.
    pub fn type_query(&mut self, raw: &str, now: Instant) {
        if self.open {
            self.search.request(raw, now);
        }
    }

    /// Apply a query immediately.
    pub fn submit_query(&mut self, raw: &str, now: Instant) {
        if self.open {
            let query = self.search.request_immediate(raw);
            self.apply_query(&query, now);
        }
    }

    /// Tab click: clears any search, then activates and scrolls to the
    /// category's section.
    pub fn click_tab(&mut self, category: Category, now: Instant) -> Option<ScrollCommand> {
        if !self.open {
            return None;
        }
        if self.view == ViewMode::Flat || self.search.is_pending() {
            let query = self.search.request_immediate("");
            self.apply_query(&query, now);
        }
        let command = self.controller.click_tab(category, now)?;
        self.canvas.scroll_to(command.offset);
        Some(command)
    }

    /// User scroll to content row `offset` (clamped).
    ///
    /// Returns the newly active category when the highlight moved.
    pub fn scroll_to(&mut self, offset: u32, now: Instant) -> Option<Category> {
        if !self.open {
            return None;
        }
        self.canvas.scroll_to(offset);
        self.sync_scroll(now)
    }

    /// Scroll by `delta` rows, as a mouse wheel would.
    pub fn scroll_by(&mut self, delta: i32, now: Instant) -> Option<Category> {
        let current = self.canvas.scroll_offset();
        let target = current.saturating_add_signed(delta);
        self.scroll_to(target, now)
    }

    /// Mouse click at viewport position (`x`, `y`).
    pub fn click(&mut self, x: u32, y: u32, now: Instant) -> Option<Activation> {
        let element = self.canvas.hit_test(x, y)?;
        self.activate(element, now)
    }

    /// Activate a rendered element.
    pub fn activate(&mut self, element: ElementId, now: Instant) -> Option<Activation> {
        if !self.open {
            return None;
        }
        let activation = self.renderer.activate(element)?;
        if let Activation::Selected(record) = &activation {
            self.select(record.clone(), now);
        }
        Some(activation)
    }

    /// Choose option `index` of the open tone selector.
    pub fn choose_tone(&mut self, index: usize, now: Instant) -> Option<EmojiRecord> {
        if !self.open {
            return None;
        }
        let record = self.renderer.choose_tone(index)?;
        self.select(record.clone(), now);
        Some(record)
    }

    /// Keyboard input.
    pub fn key(&mut self, key: PanelKey, now: Instant) -> Option<Activation> {
        if !self.open {
            return None;
        }
        if self.renderer.tone_selector().is_some() {
            match key {
                PanelKey::Digit(d @ 1..=6) => {
                    return self
                        .choose_tone(usize::from(d - 1), now)
                        .map(Activation::Selected);
                }
                PanelKey::Escape => {
                    self.renderer.dismiss_tone_selector();
                }
                _ => {}
            }
            return None;
        }
        let direction = match key {
            PanelKey::Left => FocusMove::Left,
            PanelKey::Right => FocusMove::Right,
            PanelKey::Up => FocusMove::Up,
            PanelKey::Down => FocusMove::Down,
            PanelKey::Enter => {
                let element = self.renderer.focused()?;
                return self.activate(element, now);
            }
            PanelKey::Escape => {
                self.close();
                return None;
            }
            PanelKey::Digit(_) => return None,
        };
        self.renderer.move_focus(&mut self.canvas, direction);
        self.sync_scroll(now);
        None
    }

    /// Run due timers: search, scroll guard, usage persistence, paste.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.search.poll(now) {
            if self.open {
                self.apply_query(&query, now);
            }
        }
        self.controller.poll(now);
        self.tracker.poll(now);
        if self.paste.poll(now).is_some() {
            match self.clipboard.paste() {
                Ok(()) => debug!("pasted selection"),
                Err(err) => warn!(error = %err, "paste failed"),
            }
        }
    }

    /// Replace settings, rebuilding whatever they affect.
    pub fn update_settings(&mut self, settings: PanelSettings, now: Instant) {
        let layout = settings.layout();
        if layout != self.settings.layout() || settings.skin_tones != self.settings.skin_tones {
            self.renderer = Renderer::new(layout.row_capacity, settings.skin_tones, self.events.publisher());
            self.canvas.resize(layout.width(), layout.viewport_rows);
        }
        if settings.search_debounce_ms != self.settings.search_debounce_ms
            || settings.max_results != self.settings.max_results
        {
            self.search = SearchEngine::new(self.dataset.records(), settings.search_debounce(), settings.max_results);
        }
        self.controller.set_options(settings.scroll_sync());
        self.tracker.set_persist_delay(settings.persist_delay());
        self.paste.set_delay(settings.paste_delay());
        self.settings = settings;
        debug!("settings updated");

        if self.open {
            let query = self.search.current_query().to_string();
            self.apply_query(&query, now);
        }
    }

    fn apply_query(&mut self, query: &str, now: Instant) {
        if query.is_empty() {
            self.render_grouped(false, now);
        } else {
            let results = self.search.filter(query, self.dataset.records());
            self.result_count = self.renderer.render_flat(&mut self.canvas, results);
            if self.result_count == 0 {
                self.canvas.hint(0, EMPTY_RESULTS_HINT);
            }
            self.view = ViewMode::Flat;
            debug!(query, results = self.result_count, "applied search");
        }
        self.events.publish(PanelEvent::QueryChanged(query.to_string()));
    }

    /// Rebuild the grouped view and re-register every section.
    fn render_grouped(&mut self, keep_scroll: bool, now: Instant) {
        let previous = self.canvas.scroll_offset();
        let controller = &mut self.controller;
        controller.clear_sections();
        let rendered = self.renderer.render_grouped(
            &mut self.canvas,
            self.dataset.records(),
            &self.tracker,
            self.settings.frequent_limit,
            |category, header| controller.register_section(category, header.offset),
        );
        self.controller.set_categories(rendered);
        self.result_count = self.renderer.item_count();
        self.view = ViewMode::Grouped;
        if keep_scroll {
            self.canvas.scroll_to(previous);
        } else {
            // the rebuild reset the viewport to the top
            self.controller.cancel_guard();
        }
        self.sync_scroll(now);
    }

    fn sync_scroll(&mut self, now: Instant) -> Option<Category> {
        if self.view == ViewMode::Grouped {
            self.controller.on_scroll(self.canvas.scroll_offset(), now)
        } else {
            None
        }
    }

    fn select(&mut self, record: EmojiRecord, now: Instant) {
        let copied = match self.clipboard.copy(&record.glyph) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, glyph = %record.glyph, "copy failed");
                false
            }
        };
        self.tracker.track_selection(&record.glyph, now);
        info!(glyph = %record.glyph, "emoji selected");

        if self.settings.close_on_select {
            self.close();
        } else if self.view == ViewMode::Grouped {
            self.render_grouped(true, now);
        }
        if copied && self.settings.paste_on_select {
            self.paste.schedule(record.glyph, now);
        }
    }

    // Accessors

    #[must_use]
    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn tracker(&self) -> &UsageTracker {
        &self.tracker
    }

    /// Mutable tracker access (e.g. clearing history).
    pub fn tracker_mut(&mut self) -> &mut UsageTracker {
        &mut self.tracker
    }

    /// Clear usage history and rebuild the grouped view.
    pub fn clear_recents(&mut self, now: Instant) {
        self.tracker.clear(now);
        if self.open && self.view == ViewMode::Grouped {
            self.render_grouped(true, now);
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &CellCanvas {
        &self.canvas
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    #[must_use]
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// The last applied query.
    #[must_use]
    pub fn query(&self) -> &str {
        self.search.current_query()
    }

    /// Number of items currently rendered.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.result_count
    }

    #[must_use]
    pub fn active_category(&self) -> Option<Category> {
        self.controller.active()
    }

    #[must_use]
    pub fn tabs(&self) -> Vec<TabState> {
        self.controller.tabs()
    }

    #[must_use]
    pub fn section_offset(&self, category: Category) -> Option<u32> {
        self.controller.section_offset(category)
    }

    #[must_use]
    pub fn tone_selector(&self) -> Option<&ToneSelector> {
        self.renderer.tone_selector()
    }

    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    #[must_use]
    pub fn is_paste_pending(&self) -> bool {
        self.paste.is_pending()
    }

    #[must_use]
    pub fn is_scroll_guarded(&self) -> bool {
        self.controller.is_guarded()
    }

    /// Text rendering of the popup: tab strip (grouped view only), the
    /// visible content rows, and the tone selector line when open.
    #[must_use]
    pub fn screen(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.view == ViewMode::Grouped {
            lines.push(CellCanvas::tab_strip(&self.controller.tabs()));
        }
        lines.extend(self.canvas.viewport_lines());
        if let Some(selector) = self.renderer.tone_selector() {
            lines.push(selector.line());
        }
        lines
    }
}

impl<C: Clipboard> std::fmt::Debug for PopupSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupSession")
            .field("open", &self.open)
            .field("view", &self.view)
            .field("query", &self.search.current_query())
            .field("results", &self.result_count)
            .field("controller", &self.controller)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}
