//! Benchmarks for diffing and planning.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ngsync::graph::{Scope, Triple, TripleSet, diff};
use ngsync::plan::{plan_full, plan_scoped};
use ngsync::store::update;

/// `n` triples over `n / 10` subjects, values offset by `shift`.
fn synthetic(n: usize, shift: usize) -> TripleSet {
    (0..n)
        .map(|i| {
            Triple::literal(
                &format!("http://ex.org/pub{}", i / 10),
                &format!("http://ex.org/p{}", i % 10),
                &(i + shift).to_string(),
            )
            .unwrap()
        })
        .collect()
}

fn bench_diff(c: &mut Criterion) {
    let desired = synthetic(10_000, 0);
    let existing = synthetic(10_000, 3);

    c.bench_function("diff_10k", |bench| {
        bench.iter(|| black_box(diff(&desired, &existing)))
    });
}

fn bench_plan_full(c: &mut Criterion) {
    let desired = synthetic(10_000, 0);
    let existing = synthetic(20_000, 0);

    c.bench_function("plan_full_10k_vs_20k", |bench| {
        bench.iter(|| black_box(plan_full(&desired, &existing)))
    });
}

fn bench_plan_scoped(c: &mut Criterion) {
    let desired = synthetic(1_000, 0);
    let existing = synthetic(20_000, 1);
    let removals = TripleSet::new();

    c.bench_function("plan_scoped_1k_vs_20k", |bench| {
        bench.iter(|| black_box(plan_scoped(&desired, &existing, &removals)))
    });
}

fn bench_render_batch(c: &mut Criterion) {
    let scope = Scope::new("http://localhost/data/incites").unwrap();
    let batch = synthetic(500, 0).to_sorted_vec();

    c.bench_function("insert_data_500", |bench| {
        bench.iter(|| black_box(update::insert_data(&scope, &batch)))
    });
}

criterion_group!(
    benches,
    bench_diff,
    bench_plan_full,
    bench_plan_scoped,
    bench_render_batch
);
criterion_main!(benches);
