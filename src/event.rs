//! Typed panel events and the in-process event queue.
//!
//! Components publish [`PanelEvent`]s instead of calling each other. The
//! renderer publishes selections, the orchestrator drains the queue and
//! reacts. Observers registered with [`EventQueue::subscribe`] see every
//! event as it is published (the CLI uses this for tracing output).
//!
//! The queue is single-threaded and cheap to clone; clones share the same
//! underlying queue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::dataset::{Category, EmojiRecord};

/// Something that happened in the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// A glyph was chosen (base record or synthesized tone variant).
    SelectionMade(EmojiRecord),
    /// The active category tab changed.
    CategoryChanged(Category),
    /// A search query was applied.
    QueryChanged(String),
    /// The skin-tone selector opened for this base glyph.
    ToneSelectorOpened(String),
    /// The popup closed.
    PopupClosed,
}

impl PanelEvent {
    /// Short event name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectionMade(_) => "selection",
            Self::CategoryChanged(_) => "category",
            Self::QueryChanged(_) => "query",
            Self::ToneSelectorOpened(_) => "tone-selector",
            Self::PopupClosed => "closed",
        }
    }
}

type Observer = Rc<dyn Fn(&PanelEvent)>;

#[derive(Default)]
struct QueueInner {
    events: VecDeque<PanelEvent>,
    observers: Vec<Observer>,
}

/// Shared FIFO of panel events.
#[derive(Clone, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer called on every publish.
    ///
    /// Observers may publish or subscribe themselves; events they publish
    /// are queued after the one being delivered.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&PanelEvent) + 'static,
    {
        self.inner.borrow_mut().observers.push(Rc::new(observer));
    }

    /// Enqueue an event and notify observers.
    pub fn publish(&self, event: PanelEvent) {
        let observers = {
            let mut inner = self.inner.borrow_mut();
            inner.events.push_back(event.clone());
            inner.observers.clone()
        };
        for observer in &observers {
            observer(&event);
        }
    }

    /// Take the oldest queued event.
    pub fn pop(&self) -> Option<PanelEvent> {
        self.inner.borrow_mut().events.pop_front()
    }

    /// Take every queued event in publish order.
    pub fn drain(&self) -> Vec<PanelEvent> {
        self.inner.borrow_mut().events.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().events.is_empty()
    }

    /// A publishing handle suitable for injection into components.
    #[must_use]
    pub fn publisher(&self) -> impl Fn(PanelEvent) + 'static {
        let queue = self.clone();
        move |event| queue.publish(event)
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventQueue")
            .field("queued", &inner.events.len())
            .field("observers", &inner.observers.len())
            .finish()
    }
}
