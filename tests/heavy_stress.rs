#![cfg(feature = "heavy")]
use parsort::{NaturalOrder, SortEngine};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn heavy_stress_random_u64() {
    let mut rng = StdRng::seed_from_u64(123);
    let input: Vec<u64> = (0..2_000_000).map(|_| rng.gen()).collect();
    let mut expected = input.clone();
    expected.sort_unstable();

    let mut v = input;
    let stats = SortEngine::new(NaturalOrder).sort_with_stats(&mut v).unwrap();
    assert_eq!(v, expected);
    assert_eq!(stats.merges, 2_000_000 - 1);
}

#[test]
fn heavy_stress_full_fan_out() {
    let mut rng = StdRng::seed_from_u64(321);
    let input: Vec<u32> = (0..200_000).map(|_| rng.gen_range(0..1_000)).collect();
    let mut expected = input.clone();
    expected.sort();

    let mut v = input;
    SortEngine::with_cutoff(NaturalOrder, 1).sort(&mut v).unwrap();
    assert_eq!(v, expected);
}
