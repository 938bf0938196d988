//! Compare hoisted-dispatch iteration (`for_each`) against the pull
//! iterator across the three storage shapes.
//!
//! Run:
//!   cargo bench --bench iter_dispatch_bench

#![forbid(unsafe_code)]

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rowsel_index::RowIndex;

const N_ROWS: i64 = 1_000_000;
const SEED: u64 = 0x52_4F_57_53_45_4C;

fn slice_index() -> RowIndex {
    RowIndex::from_slice(0, N_ROWS, 2).expect("valid slice")
}

fn arr32_index() -> RowIndex {
    let mut rng = StdRng::seed_from_u64(SEED);
    let v: Vec<i32> = (0..N_ROWS).map(|_| rng.gen_range(0..N_ROWS as i32)).collect();
    RowIndex::from_indices32(v).expect("valid indices")
}

fn arr64_index() -> RowIndex {
    let mut rng = StdRng::seed_from_u64(SEED ^ 0x5a5a_5a5a);
    let v: Vec<i64> = (0..N_ROWS).map(|_| rng.gen_range(0..N_ROWS)).collect();
    RowIndex::from_indices64(v)
}

fn bench_iteration(c: &mut Criterion) {
    let mut g = c.benchmark_group("row_index_iteration_1m");
    g.sample_size(20);
    g.throughput(Throughput::Elements(N_ROWS as u64));

    for (name, ri) in [
        ("slice", slice_index()),
        ("arr32", arr32_index()),
        ("arr64", arr64_index()),
    ] {
        g.bench_function(format!("for_each_{name}"), |b| {
            b.iter(|| {
                let mut acc: i64 = 0;
                ri.for_each(|_, j| acc = acc.wrapping_add(j));
                black_box(acc);
            })
        });
        g.bench_function(format!("iter_{name}"), |b| {
            b.iter(|| {
                let acc: i64 = ri.iter().fold(0, i64::wrapping_add);
                black_box(acc);
            })
        });
    }

    g.finish();
}

criterion_group!(benches, bench_iteration);
criterion_main!(benches);
