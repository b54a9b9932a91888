use itertools::Itertools;
use lotofacil::{
    combination::{Combination, NUMBERS, PICK, TOTAL_COMBINATIONS, rank, unrank},
    combinatorics::n_choose_k,
    universe::slice,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[test]
fn binomial_is_exact() {
    assert_eq!(n_choose_k(25, 15), 3_268_760);
    for n in 0..=25 {
        assert_eq!(n_choose_k(n, 0), 1);
        assert_eq!(n_choose_k(n, n), 1);
        assert_eq!(n_choose_k(n, n + 3), 0);
    }
}

#[test]
fn boundaries() {
    let first: Vec<u8> = (1..=15).collect();
    let last: Vec<u8> = (11..=25).collect();
    assert_eq!(unrank(0).unwrap().numbers().as_slice(), first.as_slice());
    assert_eq!(
        unrank(TOTAL_COMBINATIONS - 1).unwrap().numbers().as_slice(),
        last.as_slice()
    );
    assert_eq!(rank(&first), Ok(0));
    assert_eq!(rank(&last), Ok(TOTAL_COMBINATIONS - 1));
}

#[test]
fn stratified_roundtrip() {
    let mut rng = StdRng::seed_from_u64(15);
    let strata = 2_000;
    let width = TOTAL_COMBINATIONS / strata;
    for stratum in 0..strata {
        let start = stratum * width;
        let index = rng.gen_range(start..start + width);
        let combination = unrank(index).unwrap();
        assert_eq!(combination.rank(), index);
        assert_eq!(rank(combination.numbers()), Ok(index));
    }
}

#[test]
fn random_subsets_roundtrip() {
    let mut rng = StdRng::seed_from_u64(25);
    for _ in 0..2_000 {
        let mut pool: Vec<i64> = (1..=NUMBERS as i64).collect();
        let mut drawn = Vec::with_capacity(PICK);
        for _ in 0..PICK {
            drawn.push(pool.swap_remove(rng.gen_range(0..pool.len())));
        }
        let combination = Combination::from_unordered(&drawn).unwrap();
        assert_eq!(unrank(combination.rank()).unwrap(), combination);
    }
}

#[test]
fn order_matches_independent_enumeration() {
    let enumerated = (1..=NUMBERS as u8).combinations(PICK).take(20_000);
    for (combination, expected) in slice(0, 20_000).zip_eq(enumerated) {
        assert_eq!(combination.numbers().as_slice(), expected.as_slice());
    }
}

#[test]
fn monotonic_across_the_universe() {
    let mut previous = unrank(0).unwrap();
    for index in (1..TOTAL_COMBINATIONS).step_by(997) {
        let current = unrank(index).unwrap();
        assert!(previous < current);
        previous = current;
    }
}
