//! Criterion benchmarks for the alignment hot paths.
//!
//! Benchmarks:
//! 1. Gap filling of one minute-resolution day (1440 records)
//! 2. Source alignment over long durations
//! 3. Merge of three aligned series

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scidata_core::config::SourceTable;
use scidata_core::domain::{DayWindow, HourWindow, RawBlock, SourceSpec};
use scidata_core::timeline::{merge_series, AlignPolicy, HourlyGapFiller, SourceAligner};

// ── Helpers ──────────────────────────────────────────────────────────

/// One record per minute, every tenth hour left out entirely.
fn minute_day(spec: &SourceSpec, tag: usize) -> RawBlock {
    let hour_col = spec.time_layout.hour_column();
    let combined = hour_col == spec.time_layout.minute_column();
    let max_col = spec
        .value_columns
        .iter()
        .copied()
        .chain([hour_col, spec.time_layout.minute_column()])
        .max()
        .unwrap_or(1);

    let mut lines = Vec::with_capacity(1440);
    for h in (0..24u32).filter(|h| h % 10 != 9) {
        for m in 0..60u32 {
            let fields: Vec<String> = (1..=max_col)
                .map(|c| {
                    if combined && c == hour_col {
                        format!("{h:02}{m:02}")
                    } else if c == hour_col {
                        h.to_string()
                    } else if c == spec.time_layout.minute_column() {
                        m.to_string()
                    } else {
                        format!("{tag}.{c}")
                    }
                })
                .collect();
            lines.push(fields.join(" "));
        }
    }
    RawBlock {
        file_name: format!("{}_{tag}.txt", spec.name),
        lines,
    }
}

fn days_for(spec: &SourceSpec, duration: u32) -> Vec<(DayWindow, Option<RawBlock>)> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    spec.day_windows(start, duration)
        .into_iter()
        .map(|day| {
            let block = minute_day(spec, day.index);
            (day, Some(block))
        })
        .collect()
}

// ── 1. Gap Filling ───────────────────────────────────────────────────

fn bench_gap_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_fill");
    let table = SourceTable::space_weather();

    for spec in table.sources() {
        let block = minute_day(spec, 0);
        group.bench_function(&spec.name, |b| {
            b.iter(|| {
                HourlyGapFiller::new(spec, HourWindow::new(0, 24), &block.file_name)
                    .fill(black_box(&block.lines))
            });
        });
    }

    group.finish();
}

// ── 2. Source Alignment ──────────────────────────────────────────────

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_align");
    let table = SourceTable::space_weather();
    let Some(spec) = table.sources().iter().find(|s| s.name == "ACE_swepam") else {
        return;
    };

    for &duration in &[7u32, 30, 365] {
        let days = days_for(spec, duration);
        group.bench_with_input(BenchmarkId::new("pad_missing", duration), &duration, |b, &d| {
            b.iter(|| SourceAligner::new(spec, AlignPolicy::PadMissing).align(black_box(&days), d));
        });
    }

    group.finish();
}

// ── 3. Merge ─────────────────────────────────────────────────────────

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let table = SourceTable::space_weather();
    let duration = 30;

    let series: Vec<_> = table
        .sources()
        .iter()
        .map(|spec| {
            SourceAligner::new(spec, AlignPolicy::PadMissing).align(&days_for(spec, duration), duration)
        })
        .collect();

    group.bench_function("three_sources_30_days", |b| {
        b.iter(|| merge_series(black_box(&series)));
    });

    group.finish();
}

criterion_group!(benches, bench_gap_fill, bench_align, bench_merge);
criterion_main!(benches);
