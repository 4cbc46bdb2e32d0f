use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use parsort::{NaturalOrder, SortEngine};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_values(rng: &mut StdRng, len: usize) -> Vec<u64> {
    (0..len).map(|_| rng.gen()).collect()
}

fn bench_cutoffs(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsort_cutoff");
    for &len in &[10_000usize, 100_000, 1_000_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let input = random_values(&mut rng, len);
        for cutoff in [1usize, 256, 4_096] {
            if cutoff == 1 && len > 100_000 {
                continue;
            }
            let engine = SortEngine::with_cutoff(NaturalOrder, cutoff);
            group.bench_with_input(
                BenchmarkId::new(format!("cutoff_{cutoff}"), len),
                &input,
                |b, input| {
                    b.iter_batched(
                        || input.clone(),
                        |mut v| {
                            engine.sort(&mut v).unwrap();
                            black_box(v);
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
        let engine = SortEngine::default();
        group.bench_with_input(BenchmarkId::new("default", len), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |mut v| {
                    engine.sort(&mut v).unwrap();
                    black_box(v);
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("std_stable", len), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |mut v| {
                    v.sort();
                    black_box(v);
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cutoffs);
criterion_main!(benches);
