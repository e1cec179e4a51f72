//! Fuzz target for skin-tone derivation.
//!
//! Tones replace rather than stack for any input string.

#![no_main]

use arbitrary::Arbitrary;
use emoji_panel::tone::{is_tone_modifier, strip_tone};
use emoji_panel::{SkinTone, apply_tone};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    glyph: &'a str,
    first: u8,
    second: u8,
}

fn tone(n: u8) -> SkinTone {
    SkinTone::ALL[usize::from(n) % SkinTone::ALL.len()]
}

fuzz_target!(|input: Input<'_>| {
    let (first, second) = (tone(input.first), tone(input.second));
    let twice = apply_tone(&apply_tone(input.glyph, first), second);
    assert_eq!(twice, apply_tone(input.glyph, second));

    let modifiers = twice.chars().filter(|&c| is_tone_modifier(c)).count();
    assert!(modifiers <= 1);
    assert_eq!(strip_tone(&twice), strip_tone(input.glyph));
});
