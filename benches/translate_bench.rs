//! Translation throughput for the sample export.
//!
//! Run with: `cargo bench`

use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dicecloud_import::config::TranslatorConfig;
use dicecloud_import::mapping::translate;
use dicecloud_import::source::parse_source;

fn sample_export() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("characters")
        .join("sample_character.json");
    fs::read_to_string(path).expect("sample character fixture should exist")
}

fn bench_translate(c: &mut Criterion) {
    let raw = sample_export();
    let config = TranslatorConfig::default();
    let doc = parse_source(&raw).expect("fixture should parse");

    let mut group = c.benchmark_group("translate");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_and_translate", |b| {
        b.iter(|| {
            let doc = parse_source(black_box(&raw)).expect("fixture should parse");
            black_box(translate(&doc, &config).expect("fixture should translate"))
        })
    });

    group.bench_function("translate_parsed", |b| {
        b.iter(|| black_box(translate(black_box(&doc), &config).expect("fixture should translate")))
    });

    group.finish();
}

criterion_group!(benches, bench_translate);
criterion_main!(benches);
