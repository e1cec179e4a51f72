//! Emoji categories and their fixed display order.

use std::fmt;

use super::record::EmojiRecord;

/// A category tab.
///
/// Declaration order is display order: deriving `Ord` gives the fixed tab
/// ordering, independent of the order categories appear in the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Synthetic category sourced from usage tracking.
    FrequentlyUsed,
    SmileysEmotion,
    PeopleBody,
    AnimalsNature,
    FoodDrink,
    TravelPlaces,
    Activities,
    Objects,
    Symbols,
    Flags,
    /// Records with a missing or unrecognised category.
    Other,
}

impl Category {
    /// Every category in display order, the synthetic one first.
    pub const ORDER: [Self; 11] = [
        Self::FrequentlyUsed,
        Self::SmileysEmotion,
        Self::PeopleBody,
        Self::AnimalsNature,
        Self::FoodDrink,
        Self::TravelPlaces,
        Self::Activities,
        Self::Objects,
        Self::Symbols,
        Self::Flags,
        Self::Other,
    ];

    /// Name used in dataset files and headers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FrequentlyUsed => "Frequently Used",
            Self::SmileysEmotion => "Smileys & Emotion",
            Self::PeopleBody => "People & Body",
            Self::AnimalsNature => "Animals & Nature",
            Self::FoodDrink => "Food & Drink",
            Self::TravelPlaces => "Travel & Places",
            Self::Activities => "Activities",
            Self::Objects => "Objects",
            Self::Symbols => "Symbols",
            Self::Flags => "Flags",
            Self::Other => "Other",
        }
    }

    /// Short tab label.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::FrequentlyUsed => "🕘",
            Self::SmileysEmotion => "😀",
            Self::PeopleBody => "👋",
            Self::AnimalsNature => "🐻",
            Self::FoodDrink => "🍔",
            Self::TravelPlaces => "🚗",
            Self::Activities => "⚽",
            Self::Objects => "💡",
            Self::Symbols => "🔣",
            Self::Flags => "🏁",
            Self::Other => "❔",
        }
    }

    /// Map a dataset category name onto a known category.
    ///
    /// Matching ignores case and accepts `and` in place of `&`. The
    /// synthetic name never maps back: records cannot claim it.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_lowercase().replace(" and ", " & ");
        Self::ORDER
            .into_iter()
            .filter(|c| !c.is_frequently_used())
            .find(|c| c.name().to_lowercase() == normalized)
            .unwrap_or(Self::Other)
    }

    /// Whether this is the synthetic "Frequently Used" category.
    #[must_use]
    pub const fn is_frequently_used(self) -> bool {
        matches!(self, Self::FrequentlyUsed)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categories to surface as tabs for `records`.
///
/// "Frequently Used" is always first; callers drop it when it has no
/// members. Real categories follow in [`Category::ORDER`], restricted to
/// those with at least one record.
#[must_use]
pub fn collect_categories(records: &[EmojiRecord]) -> Vec<Category> {
    let mut present = [false; Category::ORDER.len()];
    for record in records {
        present[record.category_kind() as usize] = true;
    }

    let mut categories = vec![Category::FrequentlyUsed];
    categories.extend(
        Category::ORDER
            .into_iter()
            .filter(|c| !c.is_frequently_used() && present[*c as usize]),
    );
    categories
}
