//! Secondary selector offering skin-tone variants of one glyph.

use crate::dataset::EmojiRecord;
use crate::tone::{SkinTone, apply_tone};

/// The open tone selector for a tone-capable record.
///
/// Options are synthesized records: the base record's fields with the
/// derived glyph and a description annotated with the tone label. The base
/// record itself is never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneSelector {
    base: EmojiRecord,
    options: Vec<EmojiRecord>,
}

impl ToneSelector {
    /// Build the six options (default plus five modifiers) for `base`.
    #[must_use]
    pub fn new(base: &EmojiRecord) -> Self {
        let options = SkinTone::ALL
            .iter()
            .map(|&tone| variant_record(base, tone))
            .collect();
        Self {
            base: base.clone(),
            options,
        }
    }

    #[must_use]
    pub fn base(&self) -> &EmojiRecord {
        &self.base
    }

    #[must_use]
    pub fn options(&self) -> &[EmojiRecord] {
        &self.options
    }

    /// The option at `index`, in [`SkinTone::ALL`] order.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&EmojiRecord> {
        self.options.get(index)
    }

    /// Option for a specific tone.
    #[must_use]
    pub fn option_for(&self, tone: SkinTone) -> Option<&EmojiRecord> {
        SkinTone::ALL
            .iter()
            .position(|&t| t == tone)
            .and_then(|i| self.options.get(i))
    }

    /// One-line rendering: `1:👍 2:👍🏻 ...`.
    #[must_use]
    pub fn line(&self) -> String {
        self.options
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}:{}", i + 1, r.glyph))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Synthesized record for `base` in `tone`.
#[must_use]
pub fn variant_record(base: &EmojiRecord, tone: SkinTone) -> EmojiRecord {
    let glyph = apply_tone(&base.glyph, tone);
    let description = match tone {
        SkinTone::Default => base.description.clone(),
        _ if base.description.is_empty() => tone.label().to_string(),
        _ => format!("{} ({})", base.description, tone.label()),
    };
    EmojiRecord {
        glyph,
        description,
        supports_tone_variants: false,
        ..base.clone()
    }
}
