//! Benchmarks for signature pickle processing.
//!
//! Covers the stages a shading run goes through per class artifact:
//! - Parsing a pickle into an entry table
//! - Renaming a namespace
//! - Serializing the table back to bytes
//! - Decoding and encoding the annotation text

extern crate sigshade;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sigshade::{
    annotation::{SevenBitCodec, TextCodec},
    utils::write_nat,
    SignaturePickle,
};
use std::hint::black_box;

/// Builds a 5.0 pickle with `count` three-component namespaces, each followed by an
/// opaque entry and a string constant mentioning the namespace.
fn build_pickle(count: usize) -> Vec<u8> {
    let mut entries: Vec<(u8, Vec<u8>)> = Vec::new();
    let push = |entries: &mut Vec<(u8, Vec<u8>)>, type_code: u8, payload: Vec<u8>| {
        entries.push((type_code, payload));
        (entries.len() - 1) as u32
    };
    let nat = |value: u32| {
        let mut buffer = Vec::new();
        write_nat(value, &mut buffer);
        buffer
    };

    for i in 0..count {
        let leaf = format!("Type{i}");
        let mut parent: Option<u32> = None;
        for component in ["com", "foo", leaf.as_str()] {
            let name = push(&mut entries, 1, component.as_bytes().to_vec());
            let mut payload = nat(name);
            if let Some(parent) = parent {
                write_nat(parent, &mut payload);
            }
            parent = Some(push(&mut entries, 10, payload));
        }
        push(&mut entries, 0x30, vec![0xAB; 12]);
        let text = push(&mut entries, 1, format!("com.foo.Type{i}").into_bytes());
        let literal = push(&mut entries, 33, nat(text));
        push(&mut entries, 15, nat(literal));
    }

    let mut data = Vec::new();
    write_nat(5, &mut data);
    write_nat(0, &mut data);
    write_nat(entries.len() as u32, &mut data);
    for (type_code, payload) in &entries {
        data.push(*type_code);
        write_nat(payload.len() as u32, &mut data);
        data.extend_from_slice(payload);
    }
    data
}

/// Benchmark parsing a small pickle, typical for a single class.
fn bench_parse_small(c: &mut Criterion) {
    let data = build_pickle(8);

    c.bench_function("pickle_parse_small", |b| {
        b.iter(|| {
            let pickle = SignaturePickle::parse(black_box(&data)).unwrap();
            black_box(pickle)
        });
    });
}

/// Benchmark parsing a large pickle, typical for a package object.
fn bench_parse_large(c: &mut Criterion) {
    let data = build_pickle(2_000);

    c.bench_function("pickle_parse_large", |b| {
        b.iter(|| {
            let pickle = SignaturePickle::parse(black_box(&data)).unwrap();
            black_box(pickle)
        });
    });
}

/// Benchmark renaming a namespace that every chain spells.
fn bench_replace(c: &mut Criterion) {
    let pickle = SignaturePickle::parse(&build_pickle(500)).unwrap();

    c.bench_function("pickle_replace", |b| {
        b.iter_batched(
            || pickle.clone(),
            |mut pickle| {
                let count = pickle.replace("com.foo", "shaded.com.foo").unwrap();
                black_box(count)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark serializing an unmodified pickle.
fn bench_serialize(c: &mut Criterion) {
    let pickle = SignaturePickle::parse(&build_pickle(500)).unwrap();

    c.bench_function("pickle_serialize", |b| {
        b.iter(|| black_box(pickle.serialize().unwrap()));
    });
}

/// Benchmark the annotation text codec in both directions.
fn bench_text_codec(c: &mut Criterion) {
    let data = build_pickle(500);
    let text = SevenBitCodec.encode(&data);

    c.bench_function("annotation_encode", |b| {
        b.iter(|| black_box(SevenBitCodec.encode(black_box(&data))));
    });
    c.bench_function("annotation_decode", |b| {
        b.iter(|| black_box(SevenBitCodec.decode(black_box(&text)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large,
    bench_replace,
    bench_serialize,
    bench_text_codec,
);
criterion_main!(benches);
