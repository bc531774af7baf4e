//! Criterion benchmarks for playback and the derived views.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use embedviz::config::VizConfig;
use embedviz::derived::{annotate, relationship_grid};
use embedviz::panels::{learning, patterns};
use embedviz::prng::Prng;
use embedviz::scheduler::ManualScheduler;

/// One full pass through the learning catalog, wrap included.
fn bench_learning_pass(c: &mut Criterion) {
    let cfg = VizConfig::default();
    c.bench_function("learning_full_pass", |b| {
        b.iter(|| {
            let mut p = learning::playback(&cfg, ManualScheduler::new());
            for _ in 0..p.len() {
                p.step();
            }
            black_box(p.position())
        });
    });
}

/// Relationship grid over the realistic view at several widths.
fn bench_relationship_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("relationship_grid");

    for dims in [4usize, 50, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(dims), dims, |b, &dims| {
            let cfg = VizConfig {
                realistic_dims: dims,
                ..VizConfig::default()
            };
            let mut prng = Prng::new(42);
            let panel = patterns::PatternsPanel::new(&cfg, &mut prng, ManualScheduler::new());
            let state = &panel.playback().state().realistic;
            b.iter(|| black_box(relationship_grid(state)));
        });
    }

    group.finish();
}

fn bench_annotate(c: &mut Criterion) {
    let catalog = learning::catalog();
    c.bench_function("annotate_catalog", |b| {
        b.iter(|| {
            for ex in catalog.iter() {
                black_box(annotate(ex.sentence, ex.focus));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_learning_pass,
    bench_relationship_grid,
    bench_annotate
);
criterion_main!(benches);
