//! Benchmarks for guardlint.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use guardlint::{frontend, Ast, CheckRegistry, CheckSelection, Engine, Origin, RuleOptions};

/// `functions` functions, each writing the persistent member `writes` times.
fn synthetic_source(functions: usize, writes: usize) -> String {
    let mut source = String::new();
    for f in 0..functions {
        source.push_str(&format!("unsafe fn f{f}(o: *mut O) {{\n"));
        if f % 3 == 0 {
            source.push_str("    let h = fopen(path, mode);\n");
        }
        for w in 0..writes {
            source.push_str(&format!("    (*(*o).m_pJPersistentObjectData).field{w} = {w};\n"));
        }
        if f % 2 == 0 {
            source.push_str("    Update(o);\n");
        }
        source.push_str("}\n");
    }
    source
}

fn lower(source: &str) -> Ast {
    frontend::parse_source("bench.rs".as_ref(), source, Origin::User).expect("bench source parses")
}

fn engine(cache: bool) -> Engine {
    let mut options = RuleOptions::default();
    options.persistent_data.cache_guard_lookups = cache;
    Engine::from_registry(&CheckRegistry::with_builtin_checks(), &CheckSelection::all(), &options)
}

fn bench_frontend(c: &mut Criterion) {
    let source = synthetic_source(200, 8);
    let mut group = c.benchmark_group("frontend");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("parse_and_lower_200_functions", |b| {
        b.iter(|| black_box(lower(black_box(&source))))
    });

    group.finish();
}

fn bench_guard_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistent_data_guard_lookup");

    for writes in [1usize, 8, 32] {
        let ast = lower(&synthetic_source(100, writes));
        for cache in [false, true] {
            let engine = engine(cache);
            let label = if cache { "cached" } else { "uncached" };
            group.bench_with_input(BenchmarkId::new(label, writes), &ast, |b, ast| {
                b.iter(|| black_box(engine.run(ast)))
            });
        }
    }

    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let ast = lower(&synthetic_source(500, 4));
    let engine = Engine::with_builtin_checks();

    c.bench_function("full_pass_500_functions", |b| b.iter(|| black_box(engine.run(&ast))));
}

criterion_group!(benches, bench_frontend, bench_guard_cache, bench_full_pass);
criterion_main!(benches);
