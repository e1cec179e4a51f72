//! Emoji dataset loading.
//!
//! A dataset file is a JSON array of objects:
//!
//! ```json
//! [
//!   { "emoji": "😀", "description": "grinning face", "category": "Smileys & Emotion",
//!     "aliases": ["grinning"], "tags": ["smile", "happy"] }
//! ]
//! ```
//!
//! Loading never fails from the caller's point of view. An unreadable or
//! unparseable file is replaced by a small built-in list; individual bad
//! entries are dropped and the rest of the file is kept.
//!
//! # Examples
//!
//! ```
//! use emoji_panel::dataset::{Category, Dataset};
//!
//! let dataset = Dataset::load("/nonexistent/emoji.json");
//! assert!(dataset.is_fallback());
//! assert_eq!(dataset.len(), 5);
//! assert_eq!(dataset.find("🚀").map(|r| r.category_kind()), Some(Category::TravelPlaces));
//! ```

mod category;
pub mod glyph;
mod record;

pub use category::{Category, collect_categories};
pub use record::{DEFAULT_CATEGORY, EmojiRecord};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Dataset shipped with the crate.
const BUNDLED_JSON: &str = include_str!("../../data/emoji.json");

/// Where a dataset came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetOrigin {
    File(PathBuf),
    Bundled,
    Fallback,
}

/// The loaded, read-only list of emoji records.
#[derive(Clone, Debug)]
pub struct Dataset {
    records: Vec<EmojiRecord>,
    origin: DatasetOrigin,
    dropped: usize,
}

impl Dataset {
    /// Load from `path`, falling back to the built-in list on failure.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path_strict(path) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!("{err}; using built-in fallback emoji list");
                Self::fallback()
            }
        }
    }

    /// Load from `path`, reporting unreadable or unparseable files.
    ///
    /// Malformed entries are still dropped silently.
    pub fn from_path_strict(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::data_load(path, e))?;
        let (records, dropped) = parse_records(&text).map_err(|e| Error::data_load(path, e))?;
        info!(
            path = %path.display(),
            records = records.len(),
            dropped,
            "loaded emoji dataset"
        );
        Ok(Self {
            records,
            origin: DatasetOrigin::File(path.to_path_buf()),
            dropped,
        })
    }

    /// The dataset embedded at compile time.
    #[must_use]
    pub fn bundled() -> Self {
        match parse_records(BUNDLED_JSON) {
            Ok((records, dropped)) => Self {
                records,
                origin: DatasetOrigin::Bundled,
                dropped,
            },
            Err(reason) => {
                warn!("bundled emoji dataset is invalid ({reason}); using fallback list");
                Self::fallback()
            }
        }
    }

    /// The built-in five-record list.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            records: fallback_records(),
            origin: DatasetOrigin::Fallback,
            dropped: 0,
        }
    }

    /// Wrap already-built records.
    #[must_use]
    pub fn from_records(records: Vec<EmojiRecord>) -> Self {
        Self {
            records,
            origin: DatasetOrigin::Bundled,
            dropped: 0,
        }
    }

    /// All records in dataset order.
    #[must_use]
    pub fn records(&self) -> &[EmojiRecord] {
        &self.records
    }

    /// Iterate records in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, EmojiRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn origin(&self) -> &DatasetOrigin {
        &self.origin
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.origin == DatasetOrigin::Fallback
    }

    /// Entries rejected during parsing.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// First record whose glyph equals `glyph`.
    #[must_use]
    pub fn find(&self, glyph: &str) -> Option<&EmojiRecord> {
        find_record(&self.records, glyph)
    }

    /// Members of `category` in dataset order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &EmojiRecord> {
        self.records
            .iter()
            .filter(move |r| r.category_kind() == category)
    }

    /// Tab categories for this dataset (see [`collect_categories`]).
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        collect_categories(&self.records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a EmojiRecord;
    type IntoIter = std::slice::Iter<'a, EmojiRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// First record in `records` whose glyph equals `glyph`.
#[must_use]
pub fn find_record<'a>(records: &'a [EmojiRecord], glyph: &str) -> Option<&'a EmojiRecord> {
    records.iter().find(|r| r.glyph == glyph)
}

/// Parse a dataset document into valid records plus a count of dropped entries.
///
/// Fails only when the document is not a JSON array.
pub fn parse_records(text: &str) -> std::result::Result<(Vec<EmojiRecord>, usize), String> {
    let document: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let Value::Array(entries) = document else {
        return Err("top-level value is not an array".to_string());
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    for (index, entry) in entries.iter().enumerate() {
        match EmojiRecord::from_value(index, entry) {
            Ok(record) => records.push(record),
            Err(err) => {
                debug!("{err}");
                dropped += 1;
            }
        }
    }
    Ok((records, dropped))
}

/// Records used when no dataset can be read.
#[must_use]
pub fn fallback_records() -> Vec<EmojiRecord> {
    vec![
        EmojiRecord::new("😀", "grinning face", "Smileys & Emotion")
            .with_aliases(&["grinning"])
            .with_tags(&["smile", "happy"]),
        EmojiRecord::new("😂", "face with tears of joy", "Smileys & Emotion")
            .with_aliases(&["joy"])
            .with_tags(&["laugh", "lol"]),
        EmojiRecord::new("❤️", "red heart", "Symbols")
            .with_aliases(&["heart"])
            .with_tags(&["love"]),
        EmojiRecord::new("👍", "thumbs up", "People & Body")
            .with_aliases(&["+1", "thumbsup"])
            .with_tags(&["approve", "ok"])
            .with_tone_variants(),
        EmojiRecord::new("🚀", "rocket", "Travel & Places")
            .with_aliases(&["rocket"])
            .with_tags(&["ship", "launch"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_bad_entries() {
        let text = r#"[
            {"emoji": "😀", "description": "grinning face", "category": "Smileys & Emotion"},
            {"description": "no glyph"},
            {"emoji": "\uFE0F"},
            {"emoji": "🐶", "category": "Animals & Nature", "aliases": ["dog"]}
        ]"#;
        let (records, dropped) = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(dropped, 2);
        assert_eq!(records[1].aliases, vec!["dog"]);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_records(r#"{"emoji": "😀"}"#).is_err());
        assert!(parse_records("not json").is_err());
    }

    #[test]
    fn test_fallback_categories() {
        let dataset = Dataset::fallback();
        assert_eq!(
            dataset.categories(),
            vec![
                Category::FrequentlyUsed,
                Category::SmileysEmotion,
                Category::PeopleBody,
                Category::TravelPlaces,
                Category::Symbols,
            ]
        );
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let dataset = Dataset::from_records(vec![
            EmojiRecord::new("⭐", "first star", "Travel & Places"),
            EmojiRecord::new("⭐", "second star", "Symbols"),
        ]);
        assert_eq!(dataset.find("⭐").map(|r| r.description.as_str()), Some("first star"));
        assert!(dataset.find("🌙").is_none());
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let dataset = Dataset::bundled();
        assert_eq!(dataset.origin(), &DatasetOrigin::Bundled);
        assert!(dataset.len() > 50);
        assert_eq!(dataset.dropped(), 0);
        assert!(dataset.categories().len() > 5);
    }

    #[test]
    fn test_in_category_keeps_dataset_order() {
        let dataset = Dataset::fallback();
        let smileys: Vec<_> = dataset
            .in_category(Category::SmileysEmotion)
            .map(|r| r.glyph.as_str())
            .collect();
        assert_eq!(smileys, vec!["😀", "😂"]);
    }
}
