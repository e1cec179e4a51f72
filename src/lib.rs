//! `emoji_panel` - emoji picker panel core
//!
//! Dataset loading, usage tracking, debounced search, category/scroll
//! synchronization and grid rendering for a popup emoji picker. The host
//! supplies input, time, a clipboard and a settings store; everything else
//! lives in a [`PopupSession`].

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Row and column indices fit in u32
#![allow(clippy::module_name_repetitions)] // Allow dataset::DatasetOrigin etc
#![allow(clippy::struct_excessive_bools)] // Settings mirror user toggles
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Records are moved into events
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod dataset;
pub mod debounce;
pub mod error;
pub mod event;
pub mod popup;
pub mod render;
pub mod search;
pub mod settings;
pub mod sync;
pub mod tone;
pub mod usage;

// Re-export core types at crate root
pub use dataset::{Category, Dataset, DatasetOrigin, EmojiRecord, collect_categories};
pub use debounce::Debouncer;
pub use error::{Error, Result};
pub use event::{EventQueue, PanelEvent};
pub use tone::{SkinTone, apply_tone};

// Re-export orchestration types
pub use popup::{Clipboard, NoopClipboard, PanelKey, PopupSession, RecordingClipboard, ViewMode};
pub use settings::{PanelLayout, PanelSettings, SizeMode, Theme};

// Re-export component types
pub use render::{Activation, CellCanvas, ElementId, Renderer, Surface, ToneSelector};
pub use search::{SearchEngine, filter};
pub use sync::{CategoryController, ScrollCommand, TabState};
pub use usage::{JsonFileStore, KeyValueStore, MemoryStore, UsageTracker};
