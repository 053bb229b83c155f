//! Benchmarks for buzchunk.
//!
//! Run with:
//!     cargo bench

use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use buzchunk::{Buzhash64, ChunkConfig, Chunker, RollingHash};

fn pseudo_random(size: usize) -> Vec<u8> {
    let mut x = 0x9e37_79b9_7f4a_7c15u64;
    (0..size)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x >> 32) as u8
        })
        .collect()
}

fn bench_chunker(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunker");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        let data = pseudo_random(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("reader", size), &data, |b, data| {
            let chunker = Chunker::default();
            b.iter(|| {
                let count = chunker
                    .chunk(Cursor::new(black_box(data.as_slice())))
                    .filter(Result::is_ok)
                    .count();
                black_box(count)
            });
        });

        // Repetitive input never hits a boundary at the default setting.
        let zeros = vec![0u8; size];
        group.bench_with_input(BenchmarkId::new("zeros", size), &zeros, |b, data| {
            let chunker = Chunker::default();
            b.iter(|| {
                let count = chunker
                    .chunk(Cursor::new(black_box(data.as_slice())))
                    .filter(Result::is_ok)
                    .count();
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_boundary_bits(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_bits");
    let data = pseudo_random(1024 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    // Smaller masks mean more emissions and more digest finalizations.
    for bits in [10, 13, 16, 24] {
        let config = ChunkConfig::new(16, bits).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(bits), &data, |b, data| {
            let chunker = Chunker::new(config);
            b.iter(|| black_box(chunker.chunk_bytes(data.clone()).unwrap().len()));
        });
    }

    group.finish();
}

fn bench_read_block_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_block_size");
    let data = pseudo_random(4 * 1024 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for block in [512, 1024, 16 * 1024, 256 * 1024] {
        let config = ChunkConfig::default().with_read_block_size(block);
        group.bench_with_input(BenchmarkId::from_parameter(block), &data, |b, data| {
            let chunker = Chunker::new(config);
            b.iter(|| {
                let count = chunker
                    .chunk(Cursor::new(data.as_slice()))
                    .filter(Result::is_ok)
                    .count();
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_rolling_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("buzhash64");
    let data = pseudo_random(1024 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("roll", |b| {
        b.iter(|| {
            let mut hash = Buzhash64::new();
            hash.seed(&data[..16]).unwrap();
            for &byte in &data[16..] {
                hash.roll(byte).unwrap();
            }
            black_box(hash.sum64())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_chunker,
    bench_boundary_bits,
    bench_read_block_size,
    bench_rolling_hash
);
criterion_main!(benches);
