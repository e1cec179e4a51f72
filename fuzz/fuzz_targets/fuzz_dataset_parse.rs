//! Fuzz target for dataset parsing.
//!
//! Arbitrary text must never panic the parser, and every record it keeps
//! must have a visible glyph.

#![no_main]

use emoji_panel::dataset::glyph::is_visible_glyph;
use emoji_panel::dataset::parse_records;
use emoji_panel::search::filter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok((records, _dropped)) = parse_records(data) else {
        return;
    };
    for record in &records {
        assert!(is_visible_glyph(&record.glyph));
    }

    // The result cap holds for any query drawn from the data.
    for record in records.iter().take(8) {
        let query = record.description.trim().to_lowercase();
        if !query.is_empty() {
            assert!(filter(&query, &records, 3).len() <= 3);
        }
    }
});
