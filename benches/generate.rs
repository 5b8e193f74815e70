//! Benchmarks for the resolution pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use specials::arena::ScratchArena;
use specials::component::Component;
use specials::pattern::parse_rows;
use specials::shapes::Cell;
use specials::Generator;

fn block(size: i32) -> Component {
    Component::new((0..size).flat_map(|y| (0..size).map(move |x| Cell::new(x, y))))
        .unwrap()
}

/// Benchmark the smallest cross.
fn bench_plus(c: &mut Criterion) {
    let pattern = parse_rows(&[".#.", "#@#", ".#."]).unwrap();
    let generator = Generator::default();
    let arena = ScratchArena::new();

    c.bench_function("generate_plus", |b| {
        b.iter(|| generator.generate(black_box(&pattern.component), &pattern.foci, None, &arena))
    });
}

/// Benchmark a long line with many overlapping windows.
fn bench_long_line(c: &mut Criterion) {
    let pattern = parse_rows(&["############@"]).unwrap();
    let generator = Generator::default();
    let arena = ScratchArena::new();

    c.bench_function("generate_long_line", |b| {
        b.iter(|| generator.generate(black_box(&pattern.component), &pattern.foci, None, &arena))
    });
}

/// Benchmark a full 16x16 region, where every tier is filled greedily.
fn bench_block_16(c: &mut Criterion) {
    let component = block(16);
    let generator = Generator::default();
    let arena = ScratchArena::new();

    let mut group = c.benchmark_group("block");
    group.sample_size(20);
    group.bench_function("16x16", |b| {
        b.iter(|| generator.generate(black_box(&component), &[], None, &arena))
    });
    group.finish();
}

/// Benchmark a 20x20 region, past the mask capacity.
fn bench_block_20(c: &mut Criterion) {
    let component = block(20);
    let generator = Generator::default();
    let arena = ScratchArena::new();

    let mut group = c.benchmark_group("block");
    group.sample_size(10);
    group.bench_function("20x20", |b| {
        b.iter(|| generator.generate(black_box(&component), &[], None, &arena))
    });
    group.finish();
}

criterion_group!(benches, bench_plus, bench_long_line, bench_block_16, bench_block_20);
criterion_main!(benches);
