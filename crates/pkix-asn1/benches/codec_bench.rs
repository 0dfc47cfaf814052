//! Codec benchmarks.
//!
//! Run with: cargo bench -p pkix-asn1

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigInt;
use pkix_asn1::{Block, CodecConfig, Integer, Parser};

const CERT_DER: &[u8] = include_bytes!("../../../tests/interop/data/cert.der");

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(CERT_DER.len() as u64));

    let lenient = Parser::default();
    group.bench_function("certificate", |b| {
        b.iter(|| lenient.parse(black_box(CERT_DER)))
    });

    let strict = Parser::new(CodecConfig::der());
    group.bench_function("certificate_strict", |b| {
        b.iter(|| strict.parse(black_box(CERT_DER)))
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(CERT_DER.len() as u64));

    let tree = match Block::from_ber(CERT_DER) {
        Ok(tree) => tree,
        Err(e) => panic!("fixture does not parse: {e}"),
    };
    group.bench_function("to_ber", |b| b.iter(|| black_box(&tree).to_ber()));
    group.bench_function("encoded_len", |b| {
        b.iter(|| black_box(&tree).encoded_len())
    });
    group.bench_function("preserved_encoding", |b| {
        b.iter(|| black_box(&tree).preserved_encoding().len())
    });
    group.bench_function("dump", |b| b.iter(|| black_box(&tree).to_string()));

    group.finish();
}

fn bench_integer(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer");

    for bits in [64u32, 256, 2048, 4096] {
        let value = (BigInt::from(1) << bits) - 1;
        let encoded = Integer::from_bigint(&value);

        group.bench_with_input(BenchmarkId::new("from_bigint", bits), &value, |b, v| {
            b.iter(|| Integer::from_bigint(black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("to_bigint", bits), &encoded, |b, i| {
            b.iter(|| black_box(i).to_bigint())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_encode, bench_integer);
criterion_main!(benches);
