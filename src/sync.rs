//! Category tab / scroll position synchronization.
//!
//! The controller tracks a single active category. Two inputs move it:
//!
//! - a tab click, which activates the category, returns a scroll command
//!   for its registered section, and arms a short guard window;
//! - a scroll position change, which picks the nearest section at or above
//!   the viewport top (plus a small lookahead) and activates it.
//!
//! While the guard is armed, scroll changes are ignored so the programmatic
//! scroll triggered by a click cannot bounce the highlight to a different
//! category.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::dataset::Category;
use crate::debounce::Debouncer;
use crate::event::PanelEvent;

/// Default length of the post-click guard window.
pub const DEFAULT_SCROLL_GUARD: Duration = Duration::from_millis(150);

/// Default lookahead, in rows, when picking the section under the viewport top.
pub const DEFAULT_LOOKAHEAD: u32 = 1;

/// Tuning for [`CategoryController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollSyncOptions {
    /// Rows below the viewport top that still count as "reached".
    pub lookahead: u32,
    /// How long scroll-driven transitions are suppressed after a tab click.
    pub guard: Duration,
}

impl Default for ScrollSyncOptions {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            guard: DEFAULT_SCROLL_GUARD,
        }
    }
}

/// One tab of the category strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabState {
    pub category: Category,
    pub active: bool,
}

/// Request to scroll the content so a section header is at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollCommand {
    pub category: Category,
    pub offset: u32,
}

/// Active-category state machine.
pub struct CategoryController {
    options: ScrollSyncOptions,
    tabs: Vec<Category>,
    active: Option<Category>,
    sections: Vec<(Category, u32)>,
    guard: Debouncer<()>,
    publish: Option<Box<dyn Fn(PanelEvent)>>,
}

impl CategoryController {
    #[must_use]
    pub fn new(options: ScrollSyncOptions) -> Self {
        Self {
            options,
            tabs: Vec::new(),
            active: None,
            sections: Vec::new(),
            guard: Debouncer::new(options.guard),
            publish: None,
        }
    }

    /// Publish [`PanelEvent::CategoryChanged`] on every transition.
    #[must_use]
    pub fn with_publisher(mut self, publish: impl Fn(PanelEvent) + 'static) -> Self {
        self.publish = Some(Box::new(publish));
        self
    }

    #[must_use]
    pub fn options(&self) -> ScrollSyncOptions {
        self.options
    }

    /// Change tuning; an armed guard keeps its current deadline.
    pub fn set_options(&mut self, options: ScrollSyncOptions) {
        self.options = options;
        self.guard.set_delay(options.guard);
    }

    /// Replace the tab list.
    ///
    /// The active category survives when it is still listed; otherwise the
    /// first tab becomes active.
    pub fn set_categories(&mut self, tabs: Vec<Category>) {
        self.tabs = tabs;
        let keep = self.active.filter(|c| self.tabs.contains(c));
        let next = keep.or_else(|| self.tabs.first().copied());
        self.transition(next);
    }

    /// Activate the first tab, as on popup open.
    pub fn reset(&mut self) {
        self.guard.cancel();
        let first = self.tabs.first().copied();
        self.transition(first);
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.tabs
    }

    /// Forget every registered section.
    pub fn clear_sections(&mut self) {
        self.sections.clear();
    }

    /// Record where `category`'s header landed. Re-registering replaces.
    pub fn register_section(&mut self, category: Category, offset: u32) {
        if let Some(entry) = self.sections.iter_mut().find(|(c, _)| *c == category) {
            entry.1 = offset;
        } else {
            self.sections.push((category, offset));
        }
    }

    #[must_use]
    pub fn section_offset(&self, category: Category) -> Option<u32> {
        self.sections
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, offset)| offset)
    }

    /// Handle a tab click.
    ///
    /// Returns the scroll command for the clicked section when one is
    /// registered. Unknown categories are ignored.
    pub fn click_tab(&mut self, category: Category, now: Instant) -> Option<ScrollCommand> {
        if !self.tabs.contains(&category) {
            debug!(%category, "ignoring click on unlisted tab");
            return None;
        }
        self.transition(Some(category));
        self.guard.schedule((), now);
        let offset = self.section_offset(category)?;
        Some(ScrollCommand { category, offset })
    }

    /// Handle a scroll position change.
    ///
    /// Returns the newly active category when the highlight moved.
    pub fn on_scroll(&mut self, offset: u32, now: Instant) -> Option<Category> {
        self.poll(now);
        if self.guard.is_pending() {
            trace!(offset, "scroll ignored inside guard window");
            return None;
        }
        let reach = offset.saturating_add(self.options.lookahead);
        let nearest = self
            .sections
            .iter()
            .filter(|(c, top)| *top <= reach && self.tabs.contains(c))
            .min_by_key(|&&(_, top)| reach - top)
            .map(|&(c, _)| c)?;
        if self.active == Some(nearest) {
            return None;
        }
        self.transition(Some(nearest));
        Some(nearest)
    }

    /// Expire the guard window. Returns true when it just expired.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.guard.poll(now).is_some()
    }

    /// Drop the guard window immediately.
    pub fn cancel_guard(&mut self) {
        self.guard.cancel();
    }

    #[must_use]
    pub fn is_guarded(&self) -> bool {
        self.guard.is_pending()
    }

    #[must_use]
    pub fn active(&self) -> Option<Category> {
        self.active
    }

    /// Tab strip state; exactly one tab is active whenever any exist.
    #[must_use]
    pub fn tabs(&self) -> Vec<TabState> {
        self.tabs
            .iter()
            .map(|&category| TabState {
                category,
                active: self.active == Some(category),
            })
            .collect()
    }

    fn transition(&mut self, next: Option<Category>) {
        if self.active == next {
            return;
        }
        self.active = next;
        if let Some(category) = next {
            debug!(%category, "active category changed");
            if let Some(publish) = &self.publish {
                publish(PanelEvent::CategoryChanged(category));
            }
        }
    }
}

impl Default for CategoryController {
    fn default() -> Self {
        Self::new(ScrollSyncOptions::default())
    }
}

impl std::fmt::Debug for CategoryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryController")
            .field("options", &self.options)
            .field("tabs", &self.tabs)
            .field("active", &self.active)
            .field("sections", &self.sections)
            .field("guarded", &self.guard.is_pending())
            .finish_non_exhaustive()
    }
}
