use criterion::{criterion_group, criterion_main, Criterion};
use negachess::position::Position;
use negachess::search::{search, SearchOptions};
use std::sync::atomic::AtomicBool;

fn perft_bench(c: &mut Criterion) {
    let mut position = Position::new();
    c.bench_function("perft initial 3", |b| {
        b.iter(|| negachess::perft(&mut position, 3))
    });

    for m in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"] {
        position.make_from_str(m).unwrap();
    }
    c.bench_function("perft two knights 3", |b| {
        b.iter(|| negachess::perft(&mut position, 3))
    });
}

fn search_bench(c: &mut Criterion) {
    let mut position = Position::new();
    let moves = position.legal_moves();
    let stop = AtomicBool::new(false);
    let mut options = SearchOptions::default();
    options.set_seed(Some(0));
    c.bench_function("search initial depth 2", |b| {
        b.iter(|| search(&mut position, &moves, &options, &stop))
    });
    options.set_depth(3);
    c.bench_function("search initial depth 3", |b| {
        b.iter(|| search(&mut position, &moves, &options, &stop))
    });
}

criterion_group!(benches, perft_bench, search_bench);
criterion_main!(benches);
