//! Self-checks of the rank codec over the real universe.

use indicatif::{ParallelProgressIterator, ProgressBar};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::combination::{Combination, Rank, TOTAL_COMBINATIONS};

/// Whether `rank` survives decode, re-encode, and agrees with its neighbour.
pub fn check_rank(rank: Rank) -> bool {
    let Ok(combination) = Combination::from_rank(rank) else {
        return false;
    };
    if combination.rank() != rank {
        return false;
    }
    match combination.successor() {
        Some(next) => next > combination && next.rank() == rank + 1,
        None => rank == TOTAL_COMBINATIONS - 1,
    }
}

/// Check one random rank from each of `samples` equal strata of the universe.
///
/// Returns the ranks that failed.
pub fn verify_stratified(samples: usize, seed: u64) -> Vec<Rank> {
    let samples = samples.clamp(1, TOTAL_COMBINATIONS);
    let stratum = TOTAL_COMBINATIONS / samples;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|i| {
            let start = i * stratum;
            let end = if i + 1 == samples {
                TOTAL_COMBINATIONS
            } else {
                start + stratum
            };
            rng.gen_range(start..end)
        })
        .filter(|&rank| !check_rank(rank))
        .collect()
}

/// Check every rank of the universe in parallel. Returns the failing ranks.
pub fn verify_exhaustive(progress: &ProgressBar) -> Vec<Rank> {
    progress.set_length(TOTAL_COMBINATIONS as u64);
    let mut failures: Vec<Rank> = (0..TOTAL_COMBINATIONS)
        .into_par_iter()
        .progress_with(progress.clone())
        .filter(|&rank| !check_rank(rank))
        .collect();
    progress.finish();
    failures.sort_unstable();
    failures
}
