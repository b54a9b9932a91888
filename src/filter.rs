use std::fmt;

use crate::combination::{Combination, NUMBERS, PICK};
use crate::combinatorics::{n_choose_k, rank_combination, unrank_combination};
use crate::error::DomainError;

/// The numbers a combination must contain to be listed.
///
/// Combinations that contain a fixed set `R` of `r` numbers are exactly the
/// sets `R ∪ S` where `S` is a `(15 - r)`-subset of the `25 - r` other numbers,
/// and lexicographic order on the supersets agrees with lexicographic order on
/// `S`. That gives direct access to the n-th match without scanning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Filter {
    required: u32,
}

impl Filter {
    /// A filter requiring every number in `numbers`. Repeated numbers count once.
    pub fn new(numbers: &[u8]) -> Result<Self, DomainError> {
        let mut required = 0u32;
        for &number in numbers {
            if number == 0 || number as usize > NUMBERS {
                return Err(DomainError::NumberOutOfRange {
                    number: number.into(),
                });
            }
            required |= 1 << (number - 1);
        }
        let count = required.count_ones() as usize;
        if count > PICK {
            return Err(DomainError::TooManyRequired { count });
        }
        Ok(Self { required })
    }

    /// Parse free text the way a search box would: whitespace separated tokens,
    /// anything that is not a number in `1..=25` is ignored.
    pub fn parse_loose(text: &str) -> Result<Self, DomainError> {
        let numbers: Vec<u8> = text
            .split_whitespace()
            .filter_map(|token| token.parse::<u8>().ok())
            .filter(|&n| n >= 1 && n as usize <= NUMBERS)
            .collect();
        Self::new(&numbers)
    }

    pub fn is_empty(&self) -> bool {
        self.required == 0
    }

    pub fn len(&self) -> usize {
        self.required.count_ones() as usize
    }

    /// Required numbers in ascending order.
    pub fn required(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=NUMBERS as u8).filter(move |&n| self.is_required(n))
    }

    pub fn is_required(&self, number: u8) -> bool {
        (1..=NUMBERS as u8).contains(&number) && self.required & (1 << (number - 1)) != 0
    }

    pub fn matches(&self, combination: &Combination) -> bool {
        combination.mask() & self.required == self.required
    }

    /// Number of combinations in the universe that pass this filter.
    pub fn match_count(&self) -> usize {
        let r = self.len();
        n_choose_k(NUMBERS - r, PICK - r)
    }

    /// The `n`-th matching combination in rank order, or `None` past the end.
    pub fn nth_match(&self, n: usize) -> Option<Combination> {
        if n >= self.match_count() {
            return None;
        }
        let free = self.free_numbers();
        let picked = unrank_combination(free.len(), PICK - self.len(), n);
        let mut numbers: Vec<u8> = self
            .required()
            .chain(picked.into_iter().map(|i| free[i]))
            .collect();
        numbers.sort_unstable();
        Combination::new(&numbers).ok()
    }

    /// Position of `combination` among the matches, if it matches at all.
    pub fn match_position(&self, combination: &Combination) -> Option<usize> {
        if !self.matches(combination) {
            return None;
        }
        let free = self.free_numbers();
        let indices: Vec<usize> = combination
            .numbers()
            .iter()
            .filter(|&&n| !self.is_required(n))
            .filter_map(|n| free.binary_search(n).ok())
            .collect();
        Some(rank_combination(free.len(), &indices))
    }

    fn free_numbers(&self) -> Vec<u8> {
        (1..=NUMBERS as u8)
            .filter(|&n| !self.is_required(n))
            .collect()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, number) in self.required().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02}", number)?;
        }
        Ok(())
    }
}
