//! Benchmarks for sortition pools
//!
//! Measures:
//! - Operator insertion into a growing pool
//! - Group draws at different pool sizes
//! - Weight refresh of an existing member

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera_bonding::Address;
use tessera_sortition::{PoolId, Seed, SortitionPool};

fn pool_of(size: u64) -> SortitionPool {
    let mut pool = SortitionPool::new(PoolId(0), Address::from_low_u64(0), Address::from_low_u64(1));
    for i in 0..size {
        pool.insert_or_update(Address::from_low_u64(i + 10), (i % 97 + 1) as u32)
            .unwrap();
    }
    pool
}

/// Benchmark building pools of increasing size
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for &size in &[100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| pool_of(black_box(n)))
        });
    }
    group.finish();
}

/// Benchmark drawing a 3-member and a 16-member group
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_group");

    for &size in &[100u64, 1_000, 10_000, 100_000] {
        let pool = pool_of(size);
        for &k in &[3usize, 16] {
            group.bench_with_input(
                BenchmarkId::new(format!("k{k}"), size),
                &pool,
                |b, pool| {
                    let mut s = 0u64;
                    b.iter(|| {
                        s += 1;
                        pool.select_group(black_box(k), &Seed::from_u64(s)).unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

/// Benchmark refreshing a member's weight
fn bench_refresh(c: &mut Criterion) {
    let mut pool = pool_of(10_000);
    let operator = Address::from_low_u64(5_000);
    let mut w = 1u32;
    c.bench_function("refresh_weight", |b| {
        b.iter(|| {
            w = w % 1_000 + 1;
            pool.insert_or_update(black_box(operator), w).unwrap()
        })
    });
}

criterion_group!(benches, bench_insert, bench_select, bench_refresh);
criterion_main!(benches);
