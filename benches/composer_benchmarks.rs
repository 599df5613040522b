//! Benchmarks for canvas rendering, export and history.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use composer_blocks::registry;
use composer_core::{CanvasRenderer, Device, Document};

/// Builds a document cycling through every block type.
fn generate_document(blocks: usize) -> Document {
    let defs = registry::all();
    let mut doc = Document::new(None);
    for i in 0..blocks {
        let _ = doc.add_block(defs[i % defs.len()].key, i);
    }
    doc
}

/// Benchmarks a full canvas render pass.
fn bench_canvas_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_render");

    for size in [10, 100, 500].iter() {
        let doc = generate_document(*size);
        let mut renderer = CanvasRenderer::new(Device::Desktop);

        group.bench_with_input(BenchmarkId::new("render", size), &doc, |b, doc| {
            b.iter(|| black_box(renderer.render(black_box(doc))))
        });
    }

    group.finish();
}

/// Benchmarks publishable markup export.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for size in [10, 100, 500].iter() {
        let doc = generate_document(*size);

        group.bench_with_input(BenchmarkId::new("export_markup", size), &doc, |b, doc| {
            b.iter(|| black_box(doc.export_markup()))
        });
    }

    group.finish();
}

/// Benchmarks walking the undo stack back and forth.
fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    group.bench_function("undo_redo_100", |b| {
        b.iter_with_setup(
            || generate_document(100),
            |mut doc| {
                while doc.undo() {}
                while doc.redo() {}
                black_box(doc)
            },
        )
    });

    group.bench_function("snapshot_on_add", |b| {
        b.iter_with_setup(
            || generate_document(200),
            |mut doc| {
                let len = doc.len();
                black_box(doc.add_block("paragraph", len).ok());
                black_box(doc)
            },
        )
    });

    group.finish();
}

criterion_group!(benches, bench_canvas_render, bench_export, bench_history);
criterion_main!(benches);
