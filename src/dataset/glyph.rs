//! Glyph inspection: grapheme iteration, visibility, and display width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Code points that render nothing on their own.
const INVISIBLE: [char; 6] = [
    '\u{FE0E}', // variation selector-15
    '\u{FE0F}', // variation selector-16
    '\u{200D}', // zero-width joiner
    '\u{200B}', // zero-width space
    '\u{2060}', // word joiner
    '\u{FFFD}', // replacement character
];

/// Whether `c` is invisible when it stands alone.
#[must_use]
pub fn is_invisible_char(c: char) -> bool {
    INVISIBLE.contains(&c) || c.is_whitespace() || c.is_control()
}

/// Whether `glyph` contains at least one visible code point.
///
/// A glyph made only of variation selectors, joiners, replacement
/// characters, or whitespace is rejected by the dataset loader.
#[must_use]
pub fn is_visible_glyph(glyph: &str) -> bool {
    glyph.chars().any(|c| !is_invisible_char(c))
}

/// Iterate over extended grapheme clusters of a glyph.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Number of grapheme clusters in `s`.
#[must_use]
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Terminal columns occupied by `glyph`.
///
/// Emoji are wide (2 columns). A sequence that `unicode-width` reports as
/// narrow or zero but still carries a visible code point is widened to 2 so
/// grid cells stay aligned.
#[must_use]
pub fn glyph_width(glyph: &str) -> usize {
    if glyph.is_ascii() {
        return glyph.len();
    }
    let width = UnicodeWidthStr::width(glyph);
    if is_visible_glyph(glyph) && width < 2 && grapheme_count(glyph) == 1 {
        2
    } else {
        width
    }
}

/// Trim surrounding whitespace from a raw glyph string.
#[must_use]
pub fn clean_glyph(raw: &str) -> &str {
    raw.trim()
}
