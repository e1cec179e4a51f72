//! Substring search over the emoji dataset.
//!
//! Matching is deliberately simple: each record gets one lowercase haystack
//! made from its glyph, description, aliases, and tags, and a record matches
//! when the normalized query is a substring of it. There is no tokenization,
//! ranking, or fuzzy matching. Results keep dataset order and stop at a
//! fixed cap.
//!
//! Keystroke-driven requests go through [`SearchEngine`], which debounces
//! them so only the last request in a burst is applied.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::dataset::EmojiRecord;
use crate::debounce::Debouncer;

/// Maximum number of results returned for a non-empty query.
pub const DEFAULT_MAX_RESULTS: usize = 360;

/// Delay applied to keystroke-driven search requests.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(120);

/// Trim and lowercase raw input into a query.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Lowercase haystack for `record`: glyph, description, aliases, tags.
#[must_use]
pub fn haystack(record: &EmojiRecord) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(2 + record.aliases.len() + record.tags.len());
    parts.push(&record.glyph);
    parts.push(&record.description);
    parts.extend(record.aliases.iter().map(String::as_str));
    parts.extend(record.tags.iter().map(String::as_str));
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Filter `records` by `query`.
///
/// An empty query returns every record unchanged and uncapped; the caller is
/// expected to show the grouped view instead. A non-empty query returns at
/// most `max_results` matches, the first ones in dataset order.
#[must_use]
pub fn filter<'a>(query: &str, records: &'a [EmojiRecord], max_results: usize) -> Vec<&'a EmojiRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| haystack(r).contains(query))
        .take(max_results)
        .collect()
}

/// Precomputed haystacks for a dataset.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
    haystacks: Vec<String>,
}

impl SearchIndex {
    /// Build haystacks for `records`, index-aligned.
    #[must_use]
    pub fn build(records: &[EmojiRecord]) -> Self {
        Self {
            haystacks: records.iter().map(haystack).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.haystacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.haystacks.is_empty()
    }

    /// Same contract as [`filter`], using the precomputed haystacks.
    ///
    /// `records` must be the slice the index was built from.
    #[must_use]
    pub fn filter<'a>(&self, query: &str, records: &'a [EmojiRecord], max_results: usize) -> Vec<&'a EmojiRecord> {
        debug_assert_eq!(self.haystacks.len(), records.len());
        if query.is_empty() {
            return records.iter().collect();
        }
        self.haystacks
            .iter()
            .zip(records)
            .filter(|(hay, _)| hay.contains(query))
            .map(|(_, record)| record)
            .take(max_results)
            .collect()
    }
}

/// Debounced search request handling.
///
/// The engine only decides *when* a query applies; running the filter and
/// rendering stay with the caller.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    index: SearchIndex,
    max_results: usize,
    pending: Debouncer<String>,
    current: String,
}

impl SearchEngine {
    /// Engine over `records`.
    #[must_use]
    pub fn new(records: &[EmojiRecord], debounce: Duration, max_results: usize) -> Self {
        Self {
            index: SearchIndex::build(records),
            max_results,
            pending: Debouncer::new(debounce),
            current: String::new(),
        }
    }

    /// Queue a keystroke-driven request, superseding any pending one.
    pub fn request(&mut self, raw: &str, now: Instant) {
        let query = normalize_query(raw);
        if let Some(superseded) = self.pending.schedule(query, now) {
            debug!(superseded = %superseded, "search request superseded");
        }
    }

    /// Apply a request now, bypassing and cancelling any pending one.
    pub fn request_immediate(&mut self, raw: &str) -> String {
        self.pending.cancel();
        self.current = normalize_query(raw);
        self.current.clone()
    }

    /// Release the pending request if its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let query = self.pending.poll(now)?;
        self.current.clone_from(&query);
        Some(query)
    }

    /// Drop any pending request.
    pub fn cancel(&mut self) {
        self.pending.cancel();
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// The last query that was applied.
    #[must_use]
    pub fn current_query(&self) -> &str {
        &self.current
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Filter `records` with the engine's index and cap.
    #[must_use]
    pub fn filter<'a>(&self, query: &str, records: &'a [EmojiRecord]) -> Vec<&'a EmojiRecord> {
        self.index.filter(query, records, self.max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fallback_records;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  HeArT \n"), "heart");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_haystack_skips_empty_fields() {
        let record = EmojiRecord::new("🧩", "", "Activities").with_tags(&["Puzzle"]);
        assert_eq!(haystack(&record), "🧩 puzzle");
    }

    #[test]
    fn test_filter_heart() {
        let records = fallback_records();
        let hits = filter("heart", &records, DEFAULT_MAX_RESULTS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].glyph, "❤️");
    }

    #[test]
    fn test_filter_matches_aliases_and_glyph() {
        let records = fallback_records();
        assert_eq!(filter("+1", &records, 10)[0].glyph, "👍");
        assert_eq!(filter("🚀", &records, 10)[0].glyph, "🚀");
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let records = fallback_records();
        let all = filter("", &records, 1);
        assert_eq!(all.len(), records.len());
    }

    #[test]
    fn test_cap_keeps_first_in_dataset_order() {
        let records: Vec<_> = (0..500)
            .map(|i| EmojiRecord::new("⭐", &format!("star {i}"), "Symbols"))
            .collect();
        let hits = filter("star", &records, DEFAULT_MAX_RESULTS);
        assert_eq!(hits.len(), DEFAULT_MAX_RESULTS);
        assert_eq!(hits[0].description, "star 0");
        assert_eq!(hits[359].description, "star 359");
    }

    #[test]
    fn test_index_agrees_with_filter() {
        let records = fallback_records();
        let index = SearchIndex::build(&records);
        for q in ["", "face", "o", "zzz", "❤"] {
            assert_eq!(index.filter(q, &records, 3), filter(q, &records, 3), "query {q:?}");
        }
    }

    #[test]
    fn test_engine_debounce() {
        let t0 = Instant::now();
        let records = fallback_records();
        let mut engine = SearchEngine::new(&records, Duration::from_millis(120), DEFAULT_MAX_RESULTS);

        engine.request("h", t0);
        engine.request("He", t0 + Duration::from_millis(60));
        assert_eq!(engine.poll(t0 + Duration::from_millis(150)), None);
        assert_eq!(engine.poll(t0 + Duration::from_millis(180)), Some("he".to_string()));
        assert_eq!(engine.current_query(), "he");
    }

    #[test]
    fn test_engine_immediate_cancels_pending() {
        let t0 = Instant::now();
        let records = fallback_records();
        let mut engine = SearchEngine::new(&records, Duration::from_millis(120), DEFAULT_MAX_RESULTS);

        engine.request("rock", t0);
        assert_eq!(engine.request_immediate(""), "");
        assert!(!engine.is_pending());
        assert_eq!(engine.poll(t0 + Duration::from_secs(1)), None);
    }
}
