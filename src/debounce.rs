//! Single-slot, caller-clocked debounce timer.
//!
//! A [`Debouncer`] holds at most one pending value. Scheduling a new value
//! cancels and replaces the pending one and restarts the delay, so only the
//! last request in a burst is ever released. Time never advances on its own:
//! callers pass the current [`Instant`] to [`schedule`](Debouncer::schedule)
//! and [`poll`](Debouncer::poll), which keeps the timer deterministic and
//! testable without sleeping.
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, Instant};
//! use emoji_panel::debounce::Debouncer;
//!
//! let start = Instant::now();
//! let mut search = Debouncer::new(Duration::from_millis(120));
//!
//! search.schedule("he", start);
//! search.schedule("hea", start + Duration::from_millis(50));
//!
//! // Not due yet: the second request restarted the delay.
//! assert_eq!(search.poll(start + Duration::from_millis(130)), None);
//! assert_eq!(search.poll(start + Duration::from_millis(170)), Some("hea"));
//! assert!(!search.is_pending());
//! ```

use std::time::{Duration, Instant};

/// Cancel-and-reschedule timer with a single pending slot.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debouncer<T> {
    /// Create a debouncer that releases values `delay` after the last schedule.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending value keeps its current deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule `value`, replacing any pending value.
    ///
    /// Returns the value that was superseded, if any.
    pub fn schedule(&mut self, value: T, now: Instant) -> Option<T> {
        let deadline = now + self.delay;
        self.pending
            .replace(Pending { deadline, value })
            .map(|p| p.value)
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Release the pending value immediately, regardless of its deadline.
    pub fn take(&mut self) -> Option<T> {
        self.cancel()
    }

    /// Whether a value is waiting to be released.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Peek at the pending value.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }
}
