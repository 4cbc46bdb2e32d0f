use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use parsort::{merge::merge_halves, ByKey, NaturalOrder};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn sorted_halves(rng: &mut StdRng, len: usize) -> Vec<u64> {
    let mut v: Vec<u64> = (0..len).map(|_| rng.gen_range(0..1_000_000)).collect();
    let mid = len / 2;
    v[..mid].sort_unstable();
    v[mid..].sort_unstable();
    v
}

fn bench_merge(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5155AA55);
    let len = 1 << 16;
    let interleaved = sorted_halves(&mut rng, len);
    let disjoint: Vec<u64> = (0..len as u64).collect();

    c.bench_function("merge_interleaved_64k", |b| {
        b.iter_batched(
            || interleaved.clone(),
            |mut v| {
                merge_halves(&mut v, len / 2, &NaturalOrder).unwrap();
                black_box(v);
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("merge_disjoint_64k", |b| {
        b.iter_batched(
            || disjoint.clone(),
            |mut v| {
                merge_halves(&mut v, len / 2, &NaturalOrder).unwrap();
                black_box(v);
            },
            BatchSize::SmallInput,
        )
    });

    let mut tagged: Vec<(u64, u32)> = interleaved.iter().map(|&k| (k % 64, k as u32)).collect();
    tagged[..len / 2].sort_by_key(|p| p.0);
    tagged[len / 2..].sort_by_key(|p| p.0);
    c.bench_function("merge_by_key_64k", |b| {
        b.iter_batched(
            || tagged.clone(),
            |mut v| {
                merge_halves(&mut v, len / 2, &ByKey(|p: &(u64, u32)| p.0)).unwrap();
                black_box(v);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
