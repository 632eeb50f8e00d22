use chained_hashtable::{ChainedHashTable, TableConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(n: usize, seed: u64) -> (ChainedHashTable<String, u64>, Vec<String>) {
    let mut t = ChainedHashTable::new(5).unwrap();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.put(k.clone(), i as u64).unwrap();
    }
    (t, keys)
}

fn bench_put_fresh_100k(c: &mut Criterion) {
    c.bench_function("chained::put_fresh_100k", |b| {
        b.iter_batched(
            || ChainedHashTable::<String, u64>::new(5).unwrap(),
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.put(key(x), i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

// Same workload with growth disabled: every chain gets long.
fn bench_put_no_growth_10k(c: &mut Criterion) {
    c.bench_function("chained::put_no_growth_10k", |b| {
        b.iter_batched(
            || {
                let cfg = TableConfig::default().with_upper_rehash_threshold(0.0);
                ChainedHashTable::<String, u64>::with_config(101, cfg).unwrap()
            },
            |mut t| {
                for (i, x) in lcg(2).take(10_000).enumerate() {
                    t.put(key(x), i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_100k(c: &mut Criterion) {
    let (t, keys) = filled(100_000, 7);
    c.bench_function("chained::get_hit_100k", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(t.get(k));
            }
        })
    });
}

fn bench_get_miss_100k(c: &mut Criterion) {
    let (t, _) = filled(100_000, 11);
    let misses: Vec<String> = lcg(0xdead_beef).take(100_000).map(key).collect();
    c.bench_function("chained::get_miss_100k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(t.get(k));
            }
        })
    });
}

fn bench_remove_10k_of_110k(c: &mut Criterion) {
    c.bench_function("chained::remove_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (t, keys) = filled(110_000, 5);
                let to_remove: Vec<String> = keys.into_iter().step_by(11).collect();
                (t, to_remove)
            },
            |(mut t, to_remove)| {
                for k in &to_remove {
                    t.remove(k);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_rehash_100k(c: &mut Criterion) {
    c.bench_function("chained::rehash_100k_to_4099", |b| {
        b.iter_batched(
            || filled(100_000, 13).0,
            |mut t| {
                t.rehash(4099);
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate_100k(c: &mut Criterion) {
    let (t, _) = filled(100_000, 17);
    c.bench_function("chained::iter_100k", |b| {
        b.iter(|| black_box(t.iter().map(|(_, v)| *v).sum::<u64>()))
    });
}

fn config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(20)
}

criterion_group! {
    name = benches;
    config = config();
    targets = bench_put_fresh_100k,
        bench_put_no_growth_10k,
        bench_get_hit_100k,
        bench_get_miss_100k,
        bench_remove_10k_of_110k,
        bench_rehash_100k,
        bench_iterate_100k
}
criterion_main!(benches);
