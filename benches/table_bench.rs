//! Benchmarks for SortedKV table operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sortedkv::SortedHashTable;

fn keys(n: usize) -> Vec<Vec<u8>> {
    // Interleave so inserts land all over the order list, not just the tail
    (0..n)
        .map(|i| format!("key{:06}", (i * 7919) % n).into_bytes())
        .collect()
}

fn table_benchmarks(c: &mut Criterion) {
    let keys_1k = keys(1_000);

    c.bench_function("set 1k new keys", |b| {
        b.iter_batched(
            || SortedHashTable::create(1024).unwrap(),
            |mut table| {
                for key in &keys_1k {
                    table.set(key, b"value").unwrap();
                }
                table
            },
            BatchSize::SmallInput,
        )
    });

    let mut table = SortedHashTable::create(1024).unwrap();
    for key in &keys_1k {
        table.set(key, b"value").unwrap();
    }

    c.bench_function("get hit", |b| {
        b.iter(|| black_box(table.get(black_box(&b"key000500"[..]))))
    });

    c.bench_function("get miss", |b| {
        b.iter(|| black_box(table.get(black_box(&b"absent"[..]))))
    });

    c.bench_function("render 1k", |b| b.iter(|| black_box(table.render())));

    c.bench_function("update existing", |b| {
        b.iter(|| table.set(black_box(&b"key000500"[..]), black_box(&b"other"[..])).unwrap())
    });
}

criterion_group!(benches, table_benchmarks);
criterion_main!(benches);
