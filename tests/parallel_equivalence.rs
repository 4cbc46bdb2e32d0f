#![cfg(feature = "parallel")]

use parsort::{ByKey, NaturalOrder, SortEngine, SortEngineBuilder};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_values(rng: &mut StdRng, len: usize) -> Vec<i64> {
    (0..len).map(|_| rng.gen_range(-1_000..1_000)).collect()
}

fn sort_on(threads: usize, cutoff: usize, input: &[i64]) -> Vec<i64> {
    let engine = SortEngineBuilder::new()
        .threads(threads)
        .sequential_cutoff(cutoff)
        .build()
        .unwrap();
    let mut v = input.to_vec();
    engine.sort(&mut v).unwrap();
    v
}

#[test]
fn worker_count_does_not_change_output() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let input = random_values(&mut rng, 10_000);
    let mut expected = input.clone();
    expected.sort();

    let single = sort_on(1, 64, &input);
    let quad = sort_on(4, 64, &input);
    let fine_grained = sort_on(4, 1, &input);
    assert_eq!(single, expected);
    assert_eq!(quad, expected);
    assert_eq!(fine_grained, expected);
}

#[test]
fn stability_holds_across_workers() {
    let mut rng = StdRng::seed_from_u64(7);
    let tagged: Vec<(u8, usize)> = (0..5_000).map(|i| (rng.gen_range(0..10), i)).collect();
    let mut expected = tagged.clone();
    expected.sort_by_key(|p| p.0);

    for threads in [1, 3, 8] {
        let engine = SortEngineBuilder::with_comparator(ByKey(|p: &(u8, usize)| p.0))
            .threads(threads)
            .sequential_cutoff(32)
            .build()
            .unwrap();
        let mut v = tagged.clone();
        engine.sort(&mut v).unwrap();
        assert_eq!(v, expected, "threads={threads}");
    }
}

#[test]
fn stats_do_not_depend_on_scheduling() {
    let mut rng = StdRng::seed_from_u64(99);
    let input = random_values(&mut rng, 3_000);
    let stats: Vec<_> = [1, 2, 6]
        .into_iter()
        .map(|threads| {
            let engine = SortEngineBuilder::new()
                .threads(threads)
                .sequential_cutoff(100)
                .build()
                .unwrap();
            let mut v = input.clone();
            engine.sort_with_stats(&mut v).unwrap()
        })
        .collect();
    assert!(stats.windows(2).all(|w| w[0] == w[1]));
}

proptest! {
    #[test]
    fn parallel_matches_sequential(v in prop::collection::vec(any::<u16>(), 0..400)) {
        let mut serial = v.clone();
        SortEngine::with_cutoff(NaturalOrder, usize::MAX).sort(&mut serial).unwrap();
        let mut parallel = v.clone();
        SortEngine::with_cutoff(NaturalOrder, 1).sort(&mut parallel).unwrap();
        let mut expected = v;
        expected.sort();
        prop_assert_eq!(&serial, &expected);
        prop_assert_eq!(serial, parallel);
    }
}
