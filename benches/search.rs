//! Search filtering and grid rendering performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use emoji_panel::search::{SearchIndex, filter, normalize_query};
use emoji_panel::{CellCanvas, Dataset, EmojiRecord, EventQueue, Renderer, UsageTracker};
use std::hint::black_box;
use std::time::Instant;

/// The bundled dataset repeated to roughly emoji-keyboard size.
fn large_records() -> Vec<EmojiRecord> {
    let base = Dataset::bundled();
    base.iter().cycle().take(3_600).cloned().collect()
}

fn search_filter(c: &mut Criterion) {
    let records = large_records();
    let index = SearchIndex::build(&records);

    let mut group = c.benchmark_group("filter");
    for query in ["face", "heart", "zzz", "a"] {
        group.bench_with_input(BenchmarkId::new("direct", query), query, |b, q| {
            b.iter(|| filter(black_box(q), &records, 360));
        });
        group.bench_with_input(BenchmarkId::new("indexed", query), query, |b, q| {
            b.iter(|| index.filter(black_box(q), &records, 360));
        });
    }
    group.finish();

    c.bench_function("normalize_query", |b| {
        b.iter(|| normalize_query(black_box("   Smiling FACE with Heart-Eyes  ")));
    });

    c.bench_function("index_build_3600", |b| {
        b.iter(|| SearchIndex::build(black_box(&records)));
    });
}

fn render_grids(c: &mut Criterion) {
    let records = large_records();
    let events = EventQueue::new();
    let mut tracker = UsageTracker::in_memory();
    let now = Instant::now();
    for record in records.iter().take(40) {
        tracker.track_selection(&record.glyph, now);
    }

    let mut renderer = Renderer::new(10, true, events.publisher());
    let mut canvas = CellCanvas::new(CellCanvas::width_for(10), 12);

    c.bench_function("render_grouped_3600", |b| {
        b.iter(|| renderer.render_grouped(&mut canvas, black_box(&records), &tracker, 30, |_, _| {}));
    });

    let results = filter("face", &records, 360);
    c.bench_function("render_flat_360", |b| {
        b.iter(|| renderer.render_flat(&mut canvas, black_box(results.iter().copied())));
    });
}

criterion_group!(benches, search_filter, render_grids);
criterion_main!(benches);
