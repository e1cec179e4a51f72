//! Emoji records and dataset entry validation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::category::Category;
use super::glyph;
use crate::error::Error;

/// Category assigned when an entry has none.
pub const DEFAULT_CATEGORY: &str = "Other";

/// One emoji in the dataset. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmojiRecord {
    pub glyph: String,
    pub description: String,
    pub category: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub supports_tone_variants: bool,
}

impl EmojiRecord {
    /// Create a record with no aliases, tags, or tone support.
    #[must_use]
    pub fn new(glyph: &str, description: &str, category: &str) -> Self {
        Self {
            glyph: glyph.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            aliases: Vec::new(),
            tags: Vec::new(),
            supports_tone_variants: false,
        }
    }

    /// Builder: set aliases.
    #[must_use]
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(ToString::to_string).collect();
        self
    }

    /// Builder: set tags.
    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(ToString::to_string).collect();
        self
    }

    /// Builder: mark as tone-capable.
    #[must_use]
    pub fn with_tone_variants(mut self) -> Self {
        self.supports_tone_variants = true;
        self
    }

    /// The known category this record belongs to.
    #[must_use]
    pub fn category_kind(&self) -> Category {
        Category::from_name(&self.category)
    }

    /// Parse and validate one raw dataset entry.
    ///
    /// `emoji` is required and must contain a visible code point. Optional
    /// fields of the wrong type fall back to their defaults; non-string
    /// items inside `aliases`/`tags` are skipped.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::EntryValidation {
            index,
            reason: reason.to_string(),
        };

        if !value.is_object() {
            return Err(invalid("entry is not an object"));
        }
        let raw = RawEntry::deserialize(value).map_err(|e| invalid(&e.to_string()))?;
        let raw_glyph = raw.glyph.ok_or_else(|| invalid("missing `emoji` string"))?;
        let glyph = glyph::clean_glyph(&raw_glyph);
        if !glyph::is_visible_glyph(glyph) {
            return Err(invalid("glyph has no visible characters"));
        }

        let category = raw
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        Ok(Self {
            glyph: glyph.to_string(),
            description: raw.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
            category: category.to_string(),
            aliases: raw.aliases,
            tags: raw.tags,
            supports_tone_variants: raw.skin_tones || raw.skin_tone_support,
        })
    }
}

/// Dataset entry as written on disk, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    #[serde(rename = "emoji", deserialize_with = "lenient_text")]
    glyph: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    aliases: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    tags: Vec<String>,
    #[serde(deserialize_with = "lenient_flag")]
    skin_tones: bool,
    #[serde(deserialize_with = "lenient_flag")]
    skin_tone_support: bool,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect())
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}
