use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use quark::{Atom, Signal};

fn atom_creation_benchmark(c: &mut Criterion) {
    c.bench_function("atom_creation", |b| {
        b.iter(|| {
            let atom: Atom<i32> = Atom::value(black_box(42));
            atom
        });
    });
}

fn atom_read_benchmark(c: &mut Criterion) {
    let atom: Atom<i32> = Atom::value(42);

    c.bench_function("atom_read", |b| {
        b.iter(|| {
            black_box(atom.get());
        });
    });
}

fn atom_write_benchmark(c: &mut Criterion) {
    let atom: Atom<i32> = Atom::value(0);

    c.bench_function("atom_write", |b| {
        let mut i = 0;
        b.iter(|| {
            atom.set(black_box(i));
            i += 1;
        });
    });
}

fn convert_read_benchmark(c: &mut Criterion) {
    let base: Atom<i32> = Atom::value(21);
    let doubled = base.convert(|n| n * 2, |n: i32| n / 2);

    c.bench_function("convert_read", |b| {
        b.iter(|| {
            black_box(doubled.get());
        });
    });
}

fn memoized_read_benchmark(c: &mut Criterion) {
    let base: Atom<i32> = Atom::value(5);
    let memoized = base.memo();

    c.bench_function("memoized_read", |b| {
        b.iter(|| {
            black_box(memoized.get());
        });
    });
}

fn selector_read_benchmark(c: &mut Criterion) {
    let picked: Atom<i32> = Atom::value(3);
    let group = picked.selector();
    let is_three = group.select(|| 3, 0);

    c.bench_function("selector_read", |b| {
        b.iter(|| {
            black_box(is_three.get());
        });
    });
}

fn source_read_benchmark(c: &mut Criterion) {
    let binding = Signal::new(Some(Atom::value(7)));
    let bound = Atom::source(move || binding.get());

    c.bench_function("source_read", |b| {
        b.iter(|| {
            black_box(bound.get());
        });
    });
}

criterion_group!(
    benches,
    atom_creation_benchmark,
    atom_read_benchmark,
    atom_write_benchmark,
    convert_read_benchmark,
    memoized_read_benchmark,
    selector_read_benchmark,
    source_read_benchmark
);
criterion_main!(benches);
