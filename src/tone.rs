//! Skin-tone variant derivation.
//!
//! Tone-capable emoji accept one of the five Fitzpatrick modifiers
//! (U+1F3FB..=U+1F3FF). Deriving a variant always replaces rather than
//! stacks: any modifier already present is stripped before the new one is
//! placed, so applying tone `A` and then tone `B` equals applying `B`
//! directly.

/// Variation selector-16 (emoji presentation).
pub const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// The five Unicode skin-tone modifiers, lightest first.
pub const TONE_MODIFIERS: [char; 5] = ['\u{1F3FB}', '\u{1F3FC}', '\u{1F3FD}', '\u{1F3FE}', '\u{1F3FF}'];

/// A selectable skin tone. [`SkinTone::Default`] carries no modifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SkinTone {
    #[default]
    Default,
    Light,
    MediumLight,
    Medium,
    MediumDark,
    Dark,
}

impl SkinTone {
    /// Every tone in selector order.
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::Light,
        Self::MediumLight,
        Self::Medium,
        Self::MediumDark,
        Self::Dark,
    ];

    /// The modifier code point, if any.
    #[must_use]
    pub const fn modifier(self) -> Option<char> {
        match self {
            Self::Default => None,
            Self::Light => Some(TONE_MODIFIERS[0]),
            Self::MediumLight => Some(TONE_MODIFIERS[1]),
            Self::Medium => Some(TONE_MODIFIERS[2]),
            Self::MediumDark => Some(TONE_MODIFIERS[3]),
            Self::Dark => Some(TONE_MODIFIERS[4]),
        }
    }

    /// Tone for a modifier code point.
    #[must_use]
    pub fn from_modifier(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.modifier() == Some(c))
    }

    /// Human-readable label used when annotating descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "default skin tone",
            Self::Light => "light skin tone",
            Self::MediumLight => "medium-light skin tone",
            Self::Medium => "medium skin tone",
            Self::MediumDark => "medium-dark skin tone",
            Self::Dark => "dark skin tone",
        }
    }
}

/// Whether `c` is one of the skin-tone modifiers.
#[must_use]
pub fn is_tone_modifier(c: char) -> bool {
    TONE_MODIFIERS.contains(&c)
}

/// Remove every skin-tone modifier from `glyph`.
#[must_use]
pub fn strip_tone(glyph: &str) -> String {
    glyph.chars().filter(|&c| !is_tone_modifier(c)).collect()
}

/// The tone currently applied to `glyph` (first modifier found).
#[must_use]
pub fn tone_of(glyph: &str) -> SkinTone {
    glyph
        .chars()
        .find_map(SkinTone::from_modifier)
        .unwrap_or_default()
}

/// Derive the variant of `glyph` carrying `tone`.
///
/// Existing modifiers are stripped first. The new modifier is inserted
/// immediately before a trailing VS-16 when present, otherwise appended.
#[must_use]
pub fn apply_tone(glyph: &str, tone: SkinTone) -> String {
    let mut base = strip_tone(glyph);
    let Some(modifier) = tone.modifier() else {
        return base;
    };

    if base.ends_with(VARIATION_SELECTOR_16) {
        let at = base.len() - VARIATION_SELECTOR_16.len_utf8();
        base.insert(at, modifier);
    } else {
        base.push(modifier);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_appends_modifier() {
        assert_eq!(apply_tone("👋", SkinTone::Medium), "👋\u{1F3FD}");
    }

    #[test]
    fn test_apply_inserts_before_trailing_vs16() {
        // Raised hand with fingers splayed + VS-16
        let glyph = "\u{1F590}\u{FE0F}";
        assert_eq!(apply_tone(glyph, SkinTone::Dark), "\u{1F590}\u{1F3FF}\u{FE0F}");
    }

    #[test]
    fn test_replace_not_stack() {
        let medium = apply_tone("👋", SkinTone::Medium);
        let then_light = apply_tone(&medium, SkinTone::Light);
        assert_eq!(then_light, apply_tone("👋", SkinTone::Light));
        assert_eq!(then_light.chars().filter(|&c| is_tone_modifier(c)).count(), 1);
    }

    #[test]
    fn test_default_strips() {
        let toned = apply_tone("👍", SkinTone::MediumDark);
        assert_eq!(apply_tone(&toned, SkinTone::Default), "👍");
    }

    #[test]
    fn test_tone_of() {
        assert_eq!(tone_of("👍"), SkinTone::Default);
        assert_eq!(tone_of("👍\u{1F3FC}"), SkinTone::MediumLight);
    }

    #[test]
    fn test_all_tones_distinct() {
        let variants: Vec<String> = SkinTone::ALL.iter().map(|&t| apply_tone("✋", t)).collect();
        for (i, a) in variants.iter().enumerate() {
            for b in &variants[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
