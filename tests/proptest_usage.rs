//! Property-based tests for usage tracking and coalesced persistence.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use emoji_panel::dataset::fallback_records;
use emoji_panel::usage::USAGE_KEY;
use emoji_panel::{MemoryStore, UsageTracker};
use proptest::prelude::*;

const DELAY: Duration = Duration::from_millis(500);

/// Glyphs to select; 🦄 and 🐙 are not in the fallback dataset.
fn glyph() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["😀", "😂", "❤️", "👍", "🚀", "🦄", "🐙"])
}

/// Selections with the gap in milliseconds since the previous one.
fn selections() -> impl Strategy<Value = Vec<(&'static str, u64)>> {
    prop::collection::vec((glyph(), 0u64..300), 0..40)
}

proptest! {
    /// Counts equal the number of selections and never decrease.
    #[test]
    fn counts_match_selections(picks in selections()) {
        let mut tracker = UsageTracker::in_memory();
        let mut expected: HashMap<&str, u64> = HashMap::new();
        let mut now = Instant::now();
        for (g, gap) in &picks {
            now += Duration::from_millis(*gap);
            let before = tracker.count(g);
            tracker.track_selection(g, now);
            *expected.entry(*g).or_default() += 1;
            prop_assert_eq!(tracker.count(g), before + 1);
        }
        for (g, n) in expected {
            prop_assert_eq!(tracker.count(g), n);
        }
    }

    /// A burst inside the delay produces one write of the final state.
    #[test]
    fn burst_coalesces_to_one_write(picks in prop::collection::vec(glyph(), 1..30)) {
        let store = MemoryStore::new();
        let mut tracker = UsageTracker::load(store.clone(), DELAY);
        let start = Instant::now();
        for g in &picks {
            tracker.track_selection(g, start);
            prop_assert!(!tracker.poll(start + DELAY / 2));
        }
        prop_assert!(tracker.poll(start + DELAY));
        prop_assert!(!tracker.poll(start + DELAY * 4));
        prop_assert_eq!(store.writes(), 1);
        prop_assert_eq!(store.value(USAGE_KEY), Some(tracker.serialize()));

        let reloaded = UsageTracker::load(store.clone(), DELAY);
        for g in &picks {
            prop_assert_eq!(reloaded.count(g), tracker.count(g));
        }
    }

    /// Frequently used is bounded, sorted by count, and limited to known glyphs.
    #[test]
    fn frequently_used_is_bounded_and_sorted(picks in selections(), limit in 0usize..8) {
        let records = fallback_records();
        let mut tracker = UsageTracker::in_memory();
        let now = Instant::now();
        for (g, _) in &picks {
            tracker.track_selection(g, now);
        }
        let frequent = tracker.frequently_used(&records, limit);
        prop_assert!(frequent.len() <= limit);
        for pair in frequent.windows(2) {
            prop_assert!(tracker.count(&pair[0].glyph) >= tracker.count(&pair[1].glyph));
        }
        for r in &frequent {
            prop_assert!(records.iter().any(|known| known.glyph == r.glyph));
            prop_assert!(tracker.count(&r.glyph) > 0);
        }
    }
}
