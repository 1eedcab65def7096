use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;
use std::io::Cursor;

// Reference the main crate
extern crate coltable;

use coltable::codec::{decode_row_group, encode_row_group};
use coltable::types::Row;

// Generate a rectangular batch of random rows
fn generate_rows(row_count: usize, column_count: usize) -> Vec<Row> {
    let mut rng = rand::thread_rng();
    (0..row_count)
        .map(|_| (0..column_count).map(|_| rng.r#gen::<u32>()).collect())
        .collect()
}

// Benchmark row-major to column-major encoding
pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("EncodeRowGroup");

    for &row_count in &[16usize, 1024, 65536] {
        let rows = generate_rows(row_count, 8);
        group.bench_with_input(BenchmarkId::from_parameter(row_count), &rows, |b, rows| {
            b.iter(|| encode_row_group(black_box(rows)).unwrap())
        });
    }

    group.finish();
}

// Benchmark column-major to row-major decoding
pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("DecodeRowGroup");

    for &row_count in &[16usize, 1024, 65536] {
        let bytes = encode_row_group(&generate_rows(row_count, 8)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(row_count), &bytes, |b, bytes| {
            b.iter(|| decode_row_group(&mut Cursor::new(black_box(bytes.as_slice())), 8).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
