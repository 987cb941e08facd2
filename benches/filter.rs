use clipman::models::{Listing, filter};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn listing_bytes(count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in (0..count).rev() {
        let line = format!("{}\tclipboard entry number {} with some text\n", i, i);
        out.extend_from_slice(line.as_bytes());
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let bytes = listing_bytes(1000);
    c.bench_function("parse 1000 lines", |b| {
        b.iter(|| Listing::parse(black_box(&bytes)))
    });
}

fn bench_filter(c: &mut Criterion) {
    let listing = Listing::parse(&listing_bytes(1000));
    c.bench_function("filter 1000 entries", |b| {
        b.iter(|| filter(black_box(&listing.entries), black_box("number 99")))
    });
}

criterion_group!(benches, bench_parse, bench_filter);
criterion_main!(benches);
