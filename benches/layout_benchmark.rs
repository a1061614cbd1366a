//! Benchmarks for structure-recovery performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks drive the pipeline with synthetic page content.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use relayout::geometry::Rect;
use relayout::page::{Block, Line, Span};
use relayout::{
    compose_document, detect_columns, FontSizeStats, HeadingLevelMap, LayoutConfig, StaticPage,
};

/// Build a synthetic page: `paragraphs` single-column paragraphs of body
/// text with an occasional larger heading line.
fn create_test_page(paragraphs: usize) -> StaticPage {
    let mut page = StaticPage::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    let mut y = 50.0;

    for i in 0..paragraphs {
        if i % 5 == 0 {
            page = page.with_block(Block::from_lines(vec![Line::from_spans(vec![Span::new(
                format!("Section {}", i / 5 + 1),
                Rect::new(50.0, y, 200.0, y + 18.0),
                18.0,
            )])]));
            y += 30.0;
        }

        let lines: Vec<Line> = (0..3)
            .map(|j| {
                let line_y = y + j as f32 * 14.0;
                Line::from_spans(vec![Span::new(
                    "synthetic body text line for benchmark measurement",
                    Rect::new(50.0, line_y, 500.0, line_y + 12.0),
                    12.0,
                )])
            })
            .collect();
        page = page.with_block(Block::from_lines(lines));
        y += 3.0 * 14.0 + 10.0;
    }

    page
}

/// Two-column block layout for column detection.
fn create_two_column_blocks(rows: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    for row in 0..rows {
        let y = 50.0 + row as f32 * 30.0;
        for x0 in [50.0, 330.0] {
            blocks.push(Block::from_lines(vec![Line::from_spans(vec![Span::new(
                "column cell text",
                Rect::new(x0, y, x0 + 230.0, y + 20.0),
                12.0,
            )])]));
        }
    }
    blocks
}

/// Benchmark heading-map construction over large span populations.
fn bench_heading_map(c: &mut Criterion) {
    let mut stats = FontSizeStats::new();
    for i in 0..10_000 {
        let size = match i % 50 {
            0 => 24.0,
            1..=3 => 18.0,
            _ => 12.0,
        };
        stats.record(size);
    }
    let config = LayoutConfig::default();

    c.bench_function("heading_map_build", |b| {
        b.iter(|| HeadingLevelMap::from_stats(black_box(&stats), black_box(&config)));
    });
}

/// Benchmark column detection on both paths.
fn bench_column_detection(c: &mut Criterion) {
    let blocks = create_two_column_blocks(40);
    let region = Rect::new(0.0, 0.0, 612.0, 792.0);
    let histogram = LayoutConfig::default().with_column_gap_threshold(30.0);
    let clustering = LayoutConfig::default()
        .with_column_gap_threshold(30.0)
        .with_clustering(true);

    c.bench_function("detect_columns_histogram", |b| {
        b.iter(|| detect_columns(black_box(blocks.clone()), region, black_box(&histogram)));
    });

    c.bench_function("detect_columns_clustering", |b| {
        b.iter(|| detect_columns(black_box(blocks.clone()), region, black_box(&clustering)));
    });
}

/// Benchmark whole-document composition at various sizes.
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_document");

    for page_count in [1, 5, 10].iter() {
        let pages: Vec<StaticPage> = (0..*page_count).map(|_| create_test_page(8)).collect();

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let config = LayoutConfig::default().sequential();
                compose_document(black_box(&pages), config).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_heading_map,
    bench_column_detection,
    bench_compose,
);
criterion_main!(benches);
