//! User-facing panel configuration.
//!
//! Settings are stored as one JSON object under [`SETTINGS_KEY`] in the
//! same [`KeyValueStore`] the usage tracker writes to. Missing fields take
//! their defaults, so older stored objects keep loading. Anything that
//! fails to parse or validate falls back to [`PanelSettings::default`] with
//! a warning.
//!
//! `EMOJI_PANEL_*` environment variables override stored values; see
//! [`PanelSettings::apply_env`].

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::render::{CellCanvas, DEFAULT_ROW_CAPACITY, LEFT_MARGIN, SLOT_WIDTH};
use crate::search::DEFAULT_MAX_RESULTS;
use crate::sync::ScrollSyncOptions;
use crate::usage::KeyValueStore;

/// Storage key for the serialized settings object.
pub const SETTINGS_KEY: &str = "panel-settings";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "EMOJI_PANEL_";

/// Most items a grid row may hold.
pub const MAX_ROW_CAPACITY: usize = 64;

/// Tallest viewport a custom size may request.
pub const MAX_VIEWPORT_ROWS: u32 = 256;

/// Color theme preference, consumed by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::Settings(format!("unknown theme {other:?}"))),
        }
    }
}

/// Popup size preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    Compact,
    #[default]
    Default,
    Large,
    /// Use `custom_width` × `custom_height` cells.
    Custom,
}

impl FromStr for SizeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "default" => Ok(Self::Default),
            "large" => Ok(Self::Large),
            "custom" => Ok(Self::Custom),
            other => Err(Error::Settings(format!("unknown size mode {other:?}"))),
        }
    }
}

/// Grid geometry derived from the size mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLayout {
    pub row_capacity: usize,
    pub viewport_rows: u32,
}

impl PanelLayout {
    /// Canvas width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        CellCanvas::width_for(self.row_capacity)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub show_indicator: bool,
    pub shortcut_enabled: bool,
    pub shortcut: String,
    pub paste_on_select: bool,
    pub close_on_select: bool,
    pub skin_tones: bool,
    pub theme: Theme,
    pub size_mode: SizeMode,
    /// Custom popup width in cells.
    pub custom_width: u32,
    /// Custom popup height in rows.
    pub custom_height: u32,
    pub row_capacity: usize,
    pub max_results: usize,
    pub frequent_limit: usize,
    pub search_debounce_ms: u64,
    pub scroll_guard_ms: u64,
    pub persist_delay_ms: u64,
    pub paste_delay_ms: u64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            show_indicator: true,
            shortcut_enabled: true,
            shortcut: "<Super>period".to_string(),
            paste_on_select: false,
            close_on_select: true,
            skin_tones: true,
            theme: Theme::System,
            size_mode: SizeMode::Default,
            custom_width: CellCanvas::width_for(DEFAULT_ROW_CAPACITY),
            custom_height: 10,
            row_capacity: DEFAULT_ROW_CAPACITY,
            max_results: DEFAULT_MAX_RESULTS,
            frequent_limit: 30,
            search_debounce_ms: 120,
            scroll_guard_ms: 150,
            persist_delay_ms: 500,
            paste_delay_ms: 100,
        }
    }
}

impl PanelSettings {
    /// Parse and validate a stored settings object.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text).map_err(|e| Error::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `store`, degrading to defaults.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_string(SETTINGS_KEY) {
            Ok(Some(text)) => match Self::from_json(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(error = %err, "invalid stored settings, using defaults");
                    Self::default()
                }
            },
            Ok(None) => {
                debug!("no stored settings, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(error = %err, "cannot read settings, using defaults");
                Self::default()
            }
        }
    }

    /// Write settings to `store`.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        let text = serde_json::to_string(self).map_err(|e| Error::write(SETTINGS_KEY, e))?;
        store.set_string(SETTINGS_KEY, &text)
    }

    /// Reject values the panel cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.row_capacity == 0 {
            return Err(Error::Settings("row_capacity must be at least 1".into()));
        }
        if self.row_capacity > MAX_ROW_CAPACITY {
            return Err(Error::Settings(format!(
                "row_capacity {} exceeds {MAX_ROW_CAPACITY}",
                self.row_capacity
            )));
        }
        if self.max_results == 0 {
            return Err(Error::Settings("max_results must be at least 1".into()));
        }
        if self.size_mode == SizeMode::Custom {
            if self.custom_width < LEFT_MARGIN + SLOT_WIDTH {
                return Err(Error::Settings(format!(
                    "custom_width {} cannot fit a single item",
                    self.custom_width
                )));
            }
            if self.custom_width > CellCanvas::width_for(MAX_ROW_CAPACITY) {
                return Err(Error::Settings(format!(
                    "custom_width {} is wider than {MAX_ROW_CAPACITY} items",
                    self.custom_width
                )));
            }
            if !(1..=MAX_VIEWPORT_ROWS).contains(&self.custom_height) {
                return Err(Error::Settings(format!(
                    "custom_height must be between 1 and {MAX_VIEWPORT_ROWS}"
                )));
            }
        }
        Ok(())
    }

    /// Apply `EMOJI_PANEL_*` overrides from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup` (keys include the prefix).
    ///
    /// Unparseable or out-of-range values are ignored.
    #[must_use]
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |name: &str, current: bool| get(name).map_or(current, |v| parse_bool(&v, current));
        let count = |name: &str, current: usize, max: usize| {
            get(name)
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| (1..=max).contains(&n))
                .unwrap_or(current)
        };
        let millis = |name: &str, current: u64| get(name).and_then(|v| v.parse().ok()).unwrap_or(current);

        self.show_indicator = flag("SHOW_INDICATOR", self.show_indicator);
        self.shortcut_enabled = flag("SHORTCUT_ENABLED", self.shortcut_enabled);
        if let Some(shortcut) = get("SHORTCUT") {
            self.shortcut = shortcut;
        }
        self.paste_on_select = flag("PASTE_ON_SELECT", self.paste_on_select);
        self.close_on_select = flag("CLOSE_ON_SELECT", self.close_on_select);
        self.skin_tones = flag("SKIN_TONES", self.skin_tones);
        if let Some(theme) = get("THEME").and_then(|v| v.parse().ok()) {
            self.theme = theme;
        }
        if let Some(mode) = get("SIZE_MODE").and_then(|v| v.parse().ok()) {
            self.size_mode = mode;
        }
        self.row_capacity = count("ROW_CAPACITY", self.row_capacity, MAX_ROW_CAPACITY);
        self.max_results = count("MAX_RESULTS", self.max_results, usize::MAX);
        self.frequent_limit = count("FREQUENT_LIMIT", self.frequent_limit, usize::MAX);
        self.search_debounce_ms = millis("SEARCH_DEBOUNCE_MS", self.search_debounce_ms);
        self.scroll_guard_ms = millis("SCROLL_GUARD_MS", self.scroll_guard_ms);
        self.persist_delay_ms = millis("PERSIST_DELAY_MS", self.persist_delay_ms);
        self.paste_delay_ms = millis("PASTE_DELAY_MS", self.paste_delay_ms);
        self
    }

    /// Grid geometry for the configured size mode.
    ///
    /// Out-of-range values are clamped, so unvalidated settings still give a
    /// usable grid.
    #[must_use]
    pub fn layout(&self) -> PanelLayout {
        let row_capacity = self.row_capacity.clamp(1, MAX_ROW_CAPACITY);
        match self.size_mode {
            SizeMode::Compact => PanelLayout {
                row_capacity: row_capacity.min(8),
                viewport_rows: 6,
            },
            SizeMode::Default => PanelLayout {
                row_capacity,
                viewport_rows: 10,
            },
            SizeMode::Large => PanelLayout {
                row_capacity,
                viewport_rows: 16,
            },
            SizeMode::Custom => PanelLayout {
                row_capacity: ((self.custom_width.saturating_sub(LEFT_MARGIN) / SLOT_WIDTH) as usize)
                    .clamp(1, MAX_ROW_CAPACITY),
                viewport_rows: self.custom_height.clamp(1, MAX_VIEWPORT_ROWS),
            },
        }
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub fn persist_delay(&self) -> Duration {
        Duration::from_millis(self.persist_delay_ms)
    }

    #[must_use]
    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms)
    }

    #[must_use]
    pub fn scroll_sync(&self) -> ScrollSyncOptions {
        ScrollSyncOptions {
            guard: Duration::from_millis(self.scroll_guard_ms),
            ..ScrollSyncOptions::default()
        }
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => true,
        "0" | "false" | "f" | "no" | "n" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::MemoryStore;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = PanelSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.search_debounce(), Duration::from_millis(120));
        assert_eq!(settings.scroll_sync().guard, Duration::from_millis(150));
        assert_eq!(settings.persist_delay(), Duration::from_millis(500));
        assert_eq!(settings.paste_delay(), Duration::from_millis(100));
        assert_eq!(
            settings.layout(),
            PanelLayout {
                row_capacity: 10,
                viewport_rows: 10
            }
        );
    }

    #[test]
    fn test_partial_object_fills_defaults() {
        let settings = PanelSettings::from_json(r#"{"paste_on_select": true, "theme": "dark"}"#).unwrap();
        assert!(settings.paste_on_select);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.row_capacity, 10);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = PanelSettings {
            size_mode: SizeMode::Large,
            frequent_limit: 12,
            ..PanelSettings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(PanelSettings::load(&store), settings);
    }

    #[test]
    fn test_invalid_stored_settings_fall_back() {
        let store = MemoryStore::with_value(SETTINGS_KEY, r#"{"row_capacity": 0}"#);
        assert_eq!(PanelSettings::load(&store), PanelSettings::default());

        let store = MemoryStore::with_value(SETTINGS_KEY, "not json");
        assert_eq!(PanelSettings::load(&store), PanelSettings::default());

        let store = MemoryStore::new();
        store.set_fail_reads(true);
        assert_eq!(PanelSettings::load(&store), PanelSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let settings = PanelSettings::default().apply_env_with(env(&[
            ("EMOJI_PANEL_PASTE_ON_SELECT", "yes"),
            ("EMOJI_PANEL_SKIN_TONES", "off"),
            ("EMOJI_PANEL_THEME", "Light"),
            ("EMOJI_PANEL_ROW_CAPACITY", "6"),
            ("EMOJI_PANEL_MAX_RESULTS", "0"),
            ("EMOJI_PANEL_SEARCH_DEBOUNCE_MS", "bogus"),
            ("EMOJI_PANEL_SHORTCUT", " <Ctrl>e "),
        ]));
        assert!(settings.paste_on_select);
        assert!(!settings.skin_tones);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.row_capacity, 6);
        assert_eq!(settings.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(settings.search_debounce_ms, 120);
        assert_eq!(settings.shortcut, "<Ctrl>e");
    }

    #[test]
    fn test_layouts() {
        let compact = PanelSettings {
            size_mode: SizeMode::Compact,
            ..PanelSettings::default()
        };
        assert_eq!(compact.layout().row_capacity, 8);
        assert_eq!(compact.layout().viewport_rows, 6);

        let custom = PanelSettings {
            size_mode: SizeMode::Custom,
            custom_width: 20,
            custom_height: 4,
            ..PanelSettings::default()
        };
        assert_eq!(
            custom.layout(),
            PanelLayout {
                row_capacity: 6,
                viewport_rows: 4
            }
        );
        assert_eq!(custom.layout().width(), 19);
    }

    #[test]
    fn test_custom_too_narrow_is_invalid() {
        let settings = PanelSettings {
            size_mode: SizeMode::Custom,
            custom_width: 2,
            ..PanelSettings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Settings(_))));
    }

    #[test]
    fn test_oversized_geometry_is_invalid() {
        let err = PanelSettings::from_json(r#"{"row_capacity": 2000000000}"#);
        assert!(matches!(err, Err(Error::Settings(_))));

        for (width, height) in [(u32::MAX, 10), (31, 100_000)] {
            let settings = PanelSettings {
                size_mode: SizeMode::Custom,
                custom_width: width,
                custom_height: height,
                ..PanelSettings::default()
            };
            assert!(settings.validate().is_err(), "{width}x{height}");
        }

        let settings = PanelSettings::default()
            .apply_env_with(env(&[("EMOJI_PANEL_ROW_CAPACITY", "2000000000")]));
        assert_eq!(settings.row_capacity, DEFAULT_ROW_CAPACITY);
    }

    #[test]
    fn test_layout_clamps_unvalidated_values() {
        let wide = PanelSettings {
            row_capacity: usize::MAX,
            ..PanelSettings::default()
        };
        assert_eq!(wide.layout().row_capacity, MAX_ROW_CAPACITY);
        assert_eq!(wide.layout().width(), 193);

        let custom = PanelSettings {
            size_mode: SizeMode::Custom,
            custom_width: u32::MAX,
            custom_height: u32::MAX,
            ..PanelSettings::default()
        };
        assert_eq!(
            custom.layout(),
            PanelLayout {
                row_capacity: MAX_ROW_CAPACITY,
                viewport_rows: MAX_VIEWPORT_ROWS,
            }
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("LARGE".parse::<SizeMode>().unwrap(), SizeMode::Large);
        assert!("huge".parse::<SizeMode>().is_err());
        assert!(" dark ".parse::<Theme>().is_ok());
    }
}
