use bson_value::{from_bson, to_bson, to_value, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde::Serialize;

#[derive(Serialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

#[derive(Serialize, Clone)]
struct Record {
    id: u32,
    owner: User,
    metadata: Metadata,
    scores: Vec<i64>,
    ratio: f64,
}

fn fixture() -> Value {
    let record = Record {
        id: 12345,
        owner: User {
            id: 123,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            active: true,
        },
        metadata: Metadata {
            created: "2024-01-01T00:00:00Z".to_string(),
            updated: "2024-06-01T00:00:00Z".to_string(),
            version: 7,
        },
        scores: vec![1, -1, 1 << 40, 0, 99],
        ratio: 0.875,
    };
    to_value(record).unwrap()
}

fn benchmark_encode(c: &mut Criterion) {
    let value = fixture();
    c.bench_function("encode_nested_document", |b| {
        b.iter(|| to_bson(black_box(&value)))
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = to_bson(&fixture()).unwrap();
    c.bench_function("decode_nested_document", |b| {
        b.iter(|| from_bson::<bson_value::DefaultTypes>(black_box(&bytes)))
    });
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let value = fixture();
    c.bench_function("roundtrip_nested_document", |b| {
        b.iter(|| {
            let bytes = to_bson(black_box(&value)).unwrap();
            from_bson::<bson_value::DefaultTypes>(&bytes).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_decode,
    benchmark_roundtrip
);
criterion_main!(benches);
