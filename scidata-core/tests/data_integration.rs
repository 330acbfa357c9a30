//! Integration tests for the fetch layer using local `file://` sources.
//!
//! Exercises the full path: URL template → HttpProvider (txt and zip) →
//! CachedProvider → fetch_source_days → SourceAligner.

use chrono::NaiveDate;
use scidata_core::data::{fetch_source_days, CachedProvider, FetchError, HttpProvider, QuietProgress};
use scidata_core::domain::{SourceSpec, TimeLayout};
use scidata_core::timeline::{AlignPolicy, SourceAligner};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use zip::write::SimpleFileOptions;

fn provider() -> HttpProvider {
    HttpProvider::new(Duration::from_secs(5)).unwrap()
}

fn ace_like(dir: &Path) -> SourceSpec {
    SourceSpec {
        name: "ACE_mag".into(),
        url_template: format!("file://{}/{{Y}}{{M}}{{D}}_ace_mag_1m.txt", dir.display()),
        offset_hours: 0,
        start_line: 3,
        time_layout: TimeLayout::from_columns(4, 4),
        value_columns: vec![8, 9],
    }
}

fn msc_like(dir: &Path) -> SourceSpec {
    SourceSpec {
        name: "MSC_mag".into(),
        url_template: format!("file://{}/mos{{Y}}{{M}}{{D}}t.zip", dir.display()),
        offset_hours: 0,
        start_line: 1,
        time_layout: TimeLayout::from_columns(4, 5),
        value_columns: vec![7],
    }
}

/// ACE-style day: two header lines, then one record per minute 0 and 30.
fn ace_day_text() -> String {
    let mut text = String::from("# header\n# header\n");
    for h in 0..24 {
        for m in [0, 30] {
            text.push_str(&format!(
                "2020 01 01 {h:02}{m:02} 58849 0 0 {h}.5 -{h}.25\n"
            ));
        }
    }
    text
}

fn msc_day_text() -> String {
    (0..24)
        .map(|h| format!("2020 01 01 {h} 0 0 {}\n", 17000 + h))
        .collect()
}

fn write_zip(path: &Path, entry: &str, body: &str) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer.start_file(entry, SimpleFileOptions::default()).unwrap();
    writer.write_all(body.as_bytes()).unwrap();
    writer.finish().unwrap();
}

fn jan_1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

#[test]
fn text_source_over_file_urls_aligns_to_24_rows() {
    let remote = tempfile::tempdir().unwrap();
    fs::write(remote.path().join("20200101_ace_mag_1m.txt"), ace_day_text()).unwrap();
    let spec = ace_like(remote.path());

    let blocks = fetch_source_days(&provider(), &spec, jan_1(), 1, &QuietProgress);
    assert!(blocks.all_fetched());

    let series = SourceAligner::new(&spec, AlignPolicy::Strict).align(&blocks.days, 1);
    assert!(series.is_complete());
    assert_eq!(series.rows[7].values(), &["7.5".to_string(), "-7.25".to_string()][..]);
    assert_eq!(series.stats.fill.observed, 24);
}

#[test]
fn zipped_source_is_unpacked() {
    let remote = tempfile::tempdir().unwrap();
    write_zip(
        &remote.path().join("mos20200101t.zip"),
        "mos20200101t.txt",
        &msc_day_text(),
    );
    let spec = msc_like(remote.path());

    let blocks = fetch_source_days(&provider(), &spec, jan_1(), 1, &QuietProgress);
    let block = blocks.days[0].1.as_ref().unwrap();
    assert_eq!(block.file_name, "mos20200101t.txt");
    assert_eq!(block.lines.len(), 24);

    let series = SourceAligner::new(&spec, AlignPolicy::Strict).align(&blocks.days, 1);
    assert_eq!(series.rows[23].values(), &["17023".to_string()][..]);
}

#[test]
fn missing_remote_day_is_a_fetch_gap() {
    let remote = tempfile::tempdir().unwrap();
    fs::write(remote.path().join("20200101_ace_mag_1m.txt"), ace_day_text()).unwrap();
    let spec = ace_like(remote.path());

    let blocks = fetch_source_days(&provider(), &spec, jan_1(), 2, &QuietProgress);
    assert_eq!(blocks.fetched(), 1);
    assert!(matches!(blocks.errors[0].1, FetchError::Io { .. }));

    let strict = SourceAligner::new(&spec, AlignPolicy::Strict).align(&blocks.days, 2);
    assert_eq!(strict.len(), 24);
    assert!(!strict.is_complete());
    assert_eq!(strict.stats.fetch_gaps().count(), 1);

    let padded = SourceAligner::new(&spec, AlignPolicy::PadMissing).align(&blocks.days, 2);
    assert_eq!(padded.len(), 48);
    assert_eq!(padded.stats.padded, 24);
}

#[test]
fn cache_serves_second_run_offline() {
    let remote = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    fs::write(remote.path().join("20200101_ace_mag_1m.txt"), ace_day_text()).unwrap();
    let spec = ace_like(remote.path());

    let online = CachedProvider::new(provider(), cache_dir.path());
    let first = fetch_source_days(&online, &spec, jan_1(), 1, &QuietProgress);
    assert!(first.all_fetched());
    assert!(cache_dir
        .path()
        .join("ACE_mag/20200101_ace_mag_1m.txt")
        .is_file());

    // Remote copy gone; the cached file still serves the day.
    fs::remove_file(remote.path().join("20200101_ace_mag_1m.txt")).unwrap();
    let offline = CachedProvider::new(provider(), cache_dir.path()).offline(true);
    let second = fetch_source_days(&offline, &spec, jan_1(), 1, &QuietProgress);

    assert!(second.all_fetched());
    assert_eq!(first.days[0].1, second.days[0].1);
}

#[test]
fn cleared_downloads_leave_cache_empty() {
    let remote = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    fs::write(remote.path().join("20200101_ace_mag_1m.txt"), ace_day_text()).unwrap();
    let spec = ace_like(remote.path());

    let cached = CachedProvider::new(provider(), cache_dir.path());
    fetch_source_days(&cached, &spec, jan_1(), 1, &QuietProgress);
    assert_eq!(cached.clear_downloads(), 1);

    let offline = CachedProvider::new(provider(), cache_dir.path()).offline(true);
    let blocks = fetch_source_days(&offline, &spec, jan_1(), 1, &QuietProgress);
    assert!(matches!(blocks.errors[0].1, FetchError::NotCached { .. }));
}
