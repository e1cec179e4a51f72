//! Usage frequency tracking.
//!
//! [`UsageTracker`] counts selections per glyph and derives the ranked
//! "Frequently Used" list. Counts are persisted as a JSON object
//! (`{"😀": 3, "🚀": 1}`) under [`USAGE_KEY`]. Writes are coalesced: a burst
//! of selections inside the persist delay produces exactly one write of the
//! final state.
//!
//! Storage problems never reach the selection flow. A failed read starts the
//! session with an empty map; a failed write is logged and the next natural
//! write tries again.

mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::dataset::{EmojiRecord, find_record};
use crate::debounce::Debouncer;

/// Setting key holding the serialized usage map.
pub const USAGE_KEY: &str = "emoji-usage";

/// Delay used to coalesce writes.
pub const DEFAULT_PERSIST_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UsageEntry {
    count: u64,
    /// Monotonic recency stamp; larger is more recent.
    last_used: u64,
}

/// In-memory usage map with coalesced persistence.
pub struct UsageTracker {
    entries: HashMap<String, UsageEntry>,
    next_stamp: u64,
    store: Box<dyn KeyValueStore>,
    persist: Debouncer<()>,
}

impl UsageTracker {
    /// Load the usage map from `store`.
    ///
    /// Missing data yields an empty map. Unreadable or corrupt data is
    /// logged and also yields an empty map.
    pub fn load(store: impl KeyValueStore + 'static, persist_delay: Duration) -> Self {
        let mut tracker = Self {
            entries: HashMap::new(),
            next_stamp: 0,
            store: Box::new(store),
            persist: Debouncer::new(persist_delay),
        };

        match tracker.store.get_string(USAGE_KEY) {
            Ok(Some(text)) => tracker.restore(&text),
            Ok(None) => debug!("no usage history stored yet"),
            Err(err) => warn!("{err}; usage tracking continues in memory"),
        }
        tracker
    }

    /// Tracker over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(MemoryStore::new(), DEFAULT_PERSIST_DELAY)
    }

    fn restore(&mut self, text: &str) {
        let map = match serde_json::from_str::<Map<String, Value>>(text) {
            Ok(map) => map,
            Err(err) => {
                warn!("corrupt usage history ({err}); starting empty");
                return;
            }
        };

        // Stored order is least to most recent.
        for (glyph, value) in map {
            match value.as_u64() {
                Some(count) if count > 0 => {
                    let last_used = self.bump_stamp();
                    self.entries.insert(glyph, UsageEntry { count, last_used });
                }
                Some(_) => {}
                None => debug!(glyph = %glyph, "skipping non-integer usage count"),
            }
        }
        debug!(glyphs = self.entries.len(), "restored usage history");
    }

    fn bump_stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }

    /// Record one selection of `glyph` and schedule a coalesced write.
    pub fn track_selection(&mut self, glyph: &str, now: Instant) {
        let last_used = self.bump_stamp();
        let entry = self
            .entries
            .entry(glyph.to_string())
            .or_insert(UsageEntry {
                count: 0,
                last_used,
            });
        entry.count = entry.count.saturating_add(1);
        entry.last_used = last_used;
        self.persist.schedule((), now);
    }

    /// Selection count for `glyph`.
    #[must_use]
    pub fn count(&self, glyph: &str) -> u64 {
        self.entries.get(glyph).map_or(0, |e| e.count)
    }

    /// Number of distinct glyphs tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked glyphs ranked by count, ties broken by most recent use.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&String, &UsageEntry)> = self.entries.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.last_used.cmp(&a.last_used))
        });
        ranked
            .into_iter()
            .map(|(glyph, entry)| (glyph.as_str(), entry.count))
            .collect()
    }

    /// The top `limit` glyphs mapped back to their dataset records.
    ///
    /// Glyphs among the top `limit` that are no longer in `records` are
    /// dropped, so the result may be shorter than `limit`.
    #[must_use]
    pub fn frequently_used(&self, records: &[EmojiRecord], limit: usize) -> Vec<EmojiRecord> {
        self.ranked()
            .into_iter()
            .take(limit)
            .filter_map(|(glyph, _)| find_record(records, glyph).cloned())
            .collect()
    }

    /// Forget all usage and schedule a write of the empty map.
    pub fn clear(&mut self, now: Instant) {
        self.entries.clear();
        self.persist.schedule((), now);
    }

    /// Whether a coalesced write is waiting.
    #[must_use]
    pub fn is_persist_pending(&self) -> bool {
        self.persist.is_pending()
    }

    /// Change the coalescing window for future writes.
    pub fn set_persist_delay(&mut self, delay: Duration) {
        self.persist.set_delay(delay);
    }

    /// Perform the pending write if its delay has elapsed.
    ///
    /// Returns `true` when a write was attempted.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.persist.poll(now).is_some() {
            self.write_now();
            true
        } else {
            false
        }
    }

    /// Perform the pending write immediately.
    pub fn flush(&mut self) -> bool {
        if self.persist.take().is_some() {
            self.write_now();
            true
        } else {
            false
        }
    }

    /// Serialized form of the current map, least recent first.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut entries: Vec<(&String, &UsageEntry)> = self.entries.iter().collect();
        entries.sort_by_key(|(_, e)| e.last_used);

        let mut map = Map::with_capacity(entries.len());
        for (glyph, entry) in entries {
            map.insert(glyph.clone(), Value::from(entry.count));
        }
        Value::Object(map).to_string()
    }

    fn write_now(&mut self) {
        let body = self.serialize();
        match self.store.set_string(USAGE_KEY, &body) {
            Ok(()) => debug!(glyphs = self.entries.len(), "persisted usage history"),
            Err(err) => warn!("{err}; usage kept in memory only"),
        }
    }
}

impl Drop for UsageTracker {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageTracker")
            .field("glyphs", &self.entries.len())
            .field("persist_pending", &self.persist.is_pending())
            .finish_non_exhaustive()
    }
}
