//! `emoji_panel` — headless front end for the emoji picker core
//!
//! Loads a dataset and usage history, drives a [`PopupSession`] without a
//! terminal, and prints what the panel would show.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin emoji_panel -- render
//! cargo run --bin emoji_panel -- search heart --limit 5
//! cargo run --bin emoji_panel -- --store usage.json --select 😀 frequent
//! cargo run --bin emoji_panel -- render --tab symbols --rows 6
//! ```
//!
//! Logging goes to stderr and is controlled by `EMOJI_PANEL_LOG`
//! (default `warn`).

use emoji_panel::{
    Category, Dataset, JsonFileStore, KeyValueStore, MemoryStore, NoopClipboard, PanelSettings, PopupSession,
    UsageTracker, collect_categories, filter,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "emoji_panel - headless emoji picker panel

USAGE:
    emoji_panel [OPTIONS] [COMMAND] [ARGS]

COMMANDS:
    render                  Print the popup as it opens (default)
    search <QUERY>          Print records matching QUERY
    frequent                Print the frequently used list
    categories              Print the categories present in the dataset

OPTIONS:
    -h, --help              Print this help message and exit
    --data <PATH>           Dataset JSON file (default: bundled dataset)
    --store <PATH>          Settings/usage JSON store (default: in memory)
    --select <GLYPH>        Record a selection before running (repeatable)
    --limit <N>             Maximum entries to print (default: settings)
    --tab <CATEGORY>        render: click this category tab
    --scroll <ROW>          render: scroll to this content row
    --query <TEXT>          render: apply a search query
    --rows <N>              render: items per grid row

ENVIRONMENT:
    EMOJI_PANEL_LOG         Log filter (default: warn)
    EMOJI_PANEL_*           Settings overrides (e.g. EMOJI_PANEL_ROW_CAPACITY)

EXAMPLES:
    emoji_panel search heart
    emoji_panel --store ~/.emoji.json --select 👍 --select 👍 frequent
    emoji_panel render --tab flags
";

/// What to print.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    #[default]
    Render,
    Search(String),
    Frequent,
    Categories,
}

/// Configuration parsed from command-line arguments.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub command: Command,
    pub data: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub selections: Vec<String>,
    pub limit: Option<usize>,

    // render options
    pub tab: Option<Category>,
    pub scroll: Option<u32>,
    pub query: Option<String>,
    pub row_capacity: Option<usize>,
}

/// Result of CLI parsing.
pub enum ParseResult {
    /// Successfully parsed configuration.
    Config(Config),
    /// User requested help.
    Help,
    /// Parse error with message.
    Error(String),
}

impl Config {
    /// Parse configuration from command-line arguments.
    pub fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        let mut positionals = Vec::new();

        // Skip program name
        args.next();

        while let Some(arg) = args.next() {
            let arg_str = arg.to_string_lossy().to_string();

            match arg_str.as_str() {
                "-h" | "--help" => return ParseResult::Help,

                "--data" | "--store" | "--select" | "--limit" | "--tab" | "--scroll" | "--query"
                | "--rows" => {
                    let Some(value) = args.next().map(|v| v.to_string_lossy().to_string()) else {
                        return ParseResult::Error(format!("{arg_str} requires a value"));
                    };
                    if let Err(msg) = config.apply_option(&arg_str, value) {
                        return ParseResult::Error(msg);
                    }
                }

                other => {
                    if other.starts_with('-') && other.len() > 1 {
                        return ParseResult::Error(format!("Unknown option: {other}"));
                    }
                    positionals.push(other.to_string());
                }
            }
        }

        let mut positionals = positionals.into_iter();
        config.command = match positionals.next().as_deref() {
            None | Some("render") => Command::Render,
            Some("search") => match positionals.next() {
                Some(query) => Command::Search(query),
                None => return ParseResult::Error("search requires a query".to_string()),
            },
            Some("frequent") => Command::Frequent,
            Some("categories") => Command::Categories,
            Some(other) => return ParseResult::Error(format!("Unknown command: {other}")),
        };
        if let Some(extra) = positionals.next() {
            return ParseResult::Error(format!("Unexpected argument: {extra}"));
        }

        ParseResult::Config(config)
    }

    fn apply_option(&mut self, name: &str, value: String) -> Result<(), String> {
        match name {
            "--data" => self.data = Some(PathBuf::from(value)),
            "--store" => self.store = Some(PathBuf::from(value)),
            "--select" => self.selections.push(value),
            "--query" => self.query = Some(value),
            "--limit" => self.limit = Some(parse_positive(name, &value)?),
            "--rows" => self.row_capacity = Some(parse_positive(name, &value)?),
            "--scroll" => {
                self.scroll = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| format!("Invalid --scroll value: {value}"))?,
                );
            }
            "--tab" => {
                let category = Category::from_name(&value);
                if category == Category::Other && !value.eq_ignore_ascii_case("other") {
                    return Err(format!("Unknown --tab category: {value}"));
                }
                self.tab = Some(category);
            }
            _ => return Err(format!("Unknown option: {name}")),
        }
        Ok(())
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid {name} value: {value} (must be positive integer)")),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_env("EMOJI_PANEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => {
            match config.store.clone() {
                Some(path) => run(&config, JsonFileStore::new(path)),
                None => run(&config, MemoryStore::new()),
            }
            ExitCode::SUCCESS
        }
        ParseResult::Help => {
            print!("{HELP_TEXT}");
            ExitCode::SUCCESS
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            ExitCode::FAILURE
        }
    }
}

fn run<S: KeyValueStore + 'static>(config: &Config, store: S) {
    let mut settings = PanelSettings::load(&store).apply_env();
    if let Some(rows) = config.row_capacity {
        settings.row_capacity = rows;
    }
    let dataset = match &config.data {
        Some(path) => Dataset::load(path),
        None => Dataset::bundled(),
    };
    info!(records = dataset.len(), origin = ?dataset.origin(), "dataset ready");

    let now = Instant::now();
    let mut tracker = UsageTracker::load(store, settings.persist_delay());
    for glyph in &config.selections {
        debug!(glyph = %glyph, "recording selection");
        tracker.track_selection(glyph, now);
    }
    tracker.flush();

    let limit = config.limit;
    match &config.command {
        Command::Render => {
            for line in render_lines(config, settings, dataset, tracker, now) {
                println!("{line}");
            }
        }
        Command::Search(query) => {
            let max = limit.unwrap_or(settings.max_results);
            let query = emoji_panel::search::normalize_query(query);
            for record in filter(&query, dataset.records(), max).into_iter().take(max) {
                println!("{}  {}", record.glyph, record.description);
            }
        }
        Command::Frequent => {
            let max = limit.unwrap_or(settings.frequent_limit);
            for record in tracker.frequently_used(dataset.records(), max) {
                println!("{}  {}  {}", record.glyph, tracker.count(&record.glyph), record.description);
            }
        }
        Command::Categories => {
            for category in collect_categories(dataset.records()) {
                if category.is_frequently_used() && tracker.is_empty() {
                    continue;
                }
                println!("{}  {}", category.icon(), category.name());
            }
        }
    }
}

fn render_lines(
    config: &Config,
    settings: PanelSettings,
    dataset: Dataset,
    tracker: UsageTracker,
    now: Instant,
) -> Vec<String> {
    let mut session = PopupSession::new(settings, dataset, tracker, NoopClipboard);
    session
        .events()
        .subscribe(|event| debug!(event = event.name(), "panel event"));
    session.open(now);
    if let Some(category) = config.tab {
        session.click_tab(category, now);
    }
    if let Some(row) = config.scroll {
        session.scroll_to(row, now);
    }
    if let Some(query) = &config.query {
        session.submit_query(query, now);
    }
    session.screen()
}
