//! Lazy, rank-addressed views over the universe of combinations.
//!
//! Nothing here materializes more than the combinations it is asked for. The
//! iterators walk the universe with [`Combination::successor`], which yields
//! exactly `unrank(start)`, `unrank(start + 1)`, ... without re-decoding every
//! rank from scratch.

use std::ops::ControlFlow;

use crate::combination::{Combination, Rank, TOTAL_COMBINATIONS};

/// Number of ranks examined between two progress callbacks of
/// [`filter_scan_with`].
pub const SCAN_BATCH: usize = 50_000;

/// Iterator over a contiguous range of ranks.
pub struct Slice {
    next: Option<Combination>,
    remaining: usize,
}

impl Iterator for Slice {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = if self.remaining > 0 {
            current.successor()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Slice {}

/// Combinations ranked `start`, `start + 1`, ... up to `count` of them or the
/// end of the universe, whichever comes first. A `start` past the end yields
/// nothing.
pub fn slice(start: Rank, count: usize) -> Slice {
    let available = TOTAL_COMBINATIONS.saturating_sub(start);
    let remaining = count.min(available);
    let next = if remaining > 0 {
        Combination::from_rank(start).ok()
    } else {
        None
    };
    Slice { next, remaining }
}

/// Brute-force scan for combinations accepted by a predicate.
///
/// Every rank from the starting point onwards is decoded and tested, so finding
/// few matches can cost a pass over the whole universe.
pub struct FilterScan<P> {
    predicate: P,
    cursor: Option<(Rank, Combination)>,
    remaining: usize,
    scanned: usize,
}

impl<P> FilterScan<P> {
    /// Rank the scan would examine next, or [`TOTAL_COMBINATIONS`] once exhausted.
    ///
    /// Starting a new scan here continues where this one stopped.
    pub fn next_start(&self) -> Rank {
        self.cursor
            .map(|(rank, _)| rank)
            .unwrap_or(TOTAL_COMBINATIONS)
    }

    /// Number of ranks examined so far.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    fn step(&mut self) -> Option<(Rank, Combination)> {
        let (rank, combination) = self.cursor?;
        self.scanned += 1;
        self.cursor = combination.successor().map(|next| (rank + 1, next));
        Some((rank, combination))
    }
}

impl<P: FnMut(&Combination) -> bool> Iterator for FilterScan<P> {
    type Item = (Rank, Combination);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        while let Some((rank, combination)) = self.step() {
            if (self.predicate)(&combination) {
                self.remaining -= 1;
                return Some((rank, combination));
            }
        }
        None
    }
}

/// Scan ranks from `start` upwards and yield the first `max_results` matches of
/// `predicate`, in increasing rank order.
pub fn filter_scan<P>(predicate: P, start: Rank, max_results: usize) -> FilterScan<P>
where
    P: FnMut(&Combination) -> bool,
{
    FilterScan {
        predicate,
        cursor: Combination::from_rank(start)
            .ok()
            .map(|combination| (start, combination)),
        remaining: max_results,
        scanned: 0,
    }
}

/// Progress reported between batches of [`filter_scan_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanProgress {
    pub scanned: usize,
    pub found: usize,
    pub next_rank: Rank,
}

/// Result of a scan that may have been cancelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    pub matches: Vec<(Rank, Combination)>,
    /// Where to resume scanning; [`TOTAL_COMBINATIONS`] when the universe is exhausted.
    pub next_start: Rank,
    pub scanned: usize,
    pub cancelled: bool,
}

/// Same scan as [`filter_scan`], with a yield point every `batch_size` ranks.
///
/// `on_batch` sees the progress so far and can stop the scan by returning
/// [`ControlFlow::Break`]. The matches found before that point are kept.
pub fn filter_scan_with<P, F>(
    predicate: P,
    start: Rank,
    max_results: usize,
    batch_size: usize,
    mut on_batch: F,
) -> ScanOutcome
where
    P: FnMut(&Combination) -> bool,
    F: FnMut(&ScanProgress) -> ControlFlow<()>,
{
    let batch_size = batch_size.max(1);
    let mut scan = filter_scan(predicate, start, usize::MAX);
    let mut matches = Vec::new();
    let mut cancelled = false;

    while matches.len() < max_results {
        let Some((rank, combination)) = scan.step() else {
            break;
        };
        if (scan.predicate)(&combination) {
            matches.push((rank, combination));
        }
        if scan.scanned % batch_size == 0 {
            let progress = ScanProgress {
                scanned: scan.scanned,
                found: matches.len(),
                next_rank: scan.next_start(),
            };
            if on_batch(&progress).is_break() {
                cancelled = true;
                break;
            }
        }
    }

    ScanOutcome {
        matches,
        next_start: scan.next_start(),
        scanned: scan.scanned,
        cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn slice_matches_unrank() {
        let start = 1_234_567;
        for (offset, combination) in slice(start, 300).enumerate() {
            assert_eq!(combination, Combination::from_rank(start + offset).unwrap());
        }
    }

    #[test]
    fn slice_stops_at_universe_end() {
        let items: Vec<_> = slice(TOTAL_COMBINATIONS - 3, 10).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], Combination::last());
        assert_eq!(slice(TOTAL_COMBINATIONS, 10).count(), 0);
        assert_eq!(slice(0, 0).count(), 0);
    }

    #[test]
    fn slice_is_exact_size() {
        assert_eq!(slice(0, 100).len(), 100);
        assert_eq!(slice(TOTAL_COMBINATIONS - 1, 100).len(), 1);
    }

    #[test]
    fn slices_are_independent() {
        let first: Vec<_> = slice(10, 5).collect();
        let second: Vec<_> = slice(10, 5).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn filter_scan_returns_supersets_in_rank_order() {
        let filter = Filter::new(&[1, 2, 3]).unwrap();
        let results: Vec<_> = filter_scan(|c| filter.matches(c), 0, 100).collect();
        assert_eq!(results.len(), 100);
        for (rank, combination) in &results {
            assert!(combination.contains(1));
            assert!(combination.contains(2));
            assert!(combination.contains(3));
            assert_eq!(combination.rank(), *rank);
        }
        assert!(results.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn filter_scan_agrees_with_indexed_filter() {
        let filter = Filter::new(&[2, 11, 24]).unwrap();
        let start = 500_000;
        let scanned: Vec<_> = filter_scan(|c| filter.matches(c), start, 50).collect();
        let first = filter
            .match_position(&scanned[0].1)
            .expect("scan results match the filter");
        for (offset, (_, combination)) in scanned.iter().enumerate() {
            assert_eq!(filter.nth_match(first + offset).as_ref(), Some(combination));
        }
        if first > 0 {
            let before = filter.nth_match(first - 1).unwrap();
            assert!(before.rank() < start);
        }
    }

    #[test]
    fn filter_scan_resumes() {
        let filter = Filter::new(&[25]).unwrap();
        let mut scan = filter_scan(|c| filter.matches(c), 0, 10);
        let first_page: Vec<_> = scan.by_ref().collect();
        let resumed: Vec<_> = filter_scan(|c| filter.matches(c), scan.next_start(), 10).collect();
        let together: Vec<_> = filter_scan(|c| filter.matches(c), 0, 20).collect();
        assert_eq!([first_page, resumed].concat(), together);
    }

    #[test]
    fn filter_scan_exhausts_universe() {
        let last = Combination::last();
        let mut scan = filter_scan(|c| *c == last, TOTAL_COMBINATIONS - 5, 10);
        assert_eq!(scan.next(), Some((TOTAL_COMBINATIONS - 1, last)));
        assert_eq!(scan.next(), None);
        assert_eq!(scan.next_start(), TOTAL_COMBINATIONS);
        assert_eq!(scan.scanned(), 5);
    }

    #[test]
    fn filter_scan_with_can_be_cancelled() {
        let mut batches = 0;
        let outcome = filter_scan_with(
            |c| c.contains(25) && c.contains(1) && c.contains(2),
            0,
            usize::MAX,
            1_000,
            |progress| {
                batches += 1;
                assert_eq!(progress.scanned, batches * 1_000);
                if batches == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        assert!(outcome.cancelled);
        assert_eq!(outcome.scanned, 3_000);
        assert_eq!(outcome.next_start, 3_000);
        assert!(outcome.matches.iter().all(|(rank, _)| *rank < 3_000));
    }

    #[test]
    fn filter_scan_with_matches_plain_scan() {
        let filter = Filter::new(&[5, 6]).unwrap();
        let outcome = filter_scan_with(
            |c| filter.matches(c),
            42,
            40,
            SCAN_BATCH,
            |_| ControlFlow::Continue(()),
        );
        let plain: Vec<_> = filter_scan(|c| filter.matches(c), 42, 40).collect();
        assert!(!outcome.cancelled);
        assert_eq!(outcome.matches, plain);
    }
}
