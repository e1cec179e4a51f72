//! Shared fixtures for integration tests.

#![allow(dead_code)]
#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry

use std::path::{Path, PathBuf};
use std::time::Duration;

use emoji_panel::{
    Dataset, EmojiRecord, MemoryStore, PanelSettings, PopupSession, RecordingClipboard, UsageTracker,
};

pub const MS: Duration = Duration::from_millis(1);

/// A small multi-category dataset with aliases, tags and a tone-capable hand.
pub fn sample_records() -> Vec<EmojiRecord> {
    vec![
        EmojiRecord::new("😀", "grinning face", "Smileys & Emotion").with_tags(&["smile", "happy"]),
        EmojiRecord::new("😍", "smiling face with heart-eyes", "Smileys & Emotion").with_tags(&["love"]),
        EmojiRecord::new("👋", "waving hand", "People & Body")
            .with_aliases(&["wave"])
            .with_tone_variants(),
        EmojiRecord::new("🐶", "dog face", "Animals & Nature").with_aliases(&["dog"]),
        EmojiRecord::new("🍕", "pizza", "Food & Drink"),
        EmojiRecord::new("❤️", "red heart", "Symbols").with_tags(&["love"]),
        EmojiRecord::new("🏁", "chequered flag", "Flags"),
    ]
}

pub fn stay_open() -> PanelSettings {
    PanelSettings {
        close_on_select: false,
        ..PanelSettings::default()
    }
}

/// Session over `dataset` with a shared in-memory store and a recording clipboard.
pub fn session(
    settings: PanelSettings,
    dataset: Dataset,
) -> (PopupSession<RecordingClipboard>, MemoryStore, RecordingClipboard) {
    let store = MemoryStore::new();
    let clipboard = RecordingClipboard::new();
    let tracker = UsageTracker::load(store.clone(), settings.persist_delay());
    let session = PopupSession::new(settings, dataset, tracker, clipboard.clone());
    (session, store, clipboard)
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
