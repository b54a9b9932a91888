use std::fmt;

use winnow::ModalResult;
use winnow::ascii::{digit1, space1};
use winnow::combinator::{eof, separated, terminated};
use winnow::prelude::*;

use crate::combinatorics::{next_combination, rank_combination, unrank_combination_into};
use crate::error::DomainError;

/// Size of the pool numbers are drawn from (`1..=25`).
pub const NUMBERS: usize = 25;
/// How many numbers make up one combination.
pub const PICK: usize = 15;
/// `C(25, 15)`, the size of the universe.
pub const TOTAL_COMBINATIONS: usize = 3_268_760;

/// Lexicographic position of a combination in the universe.
pub type Rank = usize;

/// Fifteen distinct numbers from `1..=25`, kept in ascending order.
///
/// The derived ordering compares the numbers lexicographically, which is the
/// same order as the ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination([u8; PICK]);

impl Combination {
    /// Build a combination from numbers that are already sorted.
    pub fn new(numbers: &[u8]) -> Result<Self, DomainError> {
        if numbers.len() != PICK {
            return Err(DomainError::WrongCount {
                count: numbers.len(),
            });
        }
        if let Some(&number) = numbers.iter().find(|&&n| n == 0 || n as usize > NUMBERS) {
            return Err(DomainError::NumberOutOfRange {
                number: number.into(),
            });
        }
        for pair in numbers.windows(2) {
            if pair[0] == pair[1] {
                return Err(DomainError::Duplicate { number: pair[0] });
            }
            if pair[0] > pair[1] {
                return Err(DomainError::NotAscending);
            }
        }
        let mut array = [0u8; PICK];
        array.copy_from_slice(numbers);
        Ok(Self(array))
    }

    /// Build a combination from numbers in any order, e.g. a drawn result
    /// as printed on the ticket.
    pub fn from_unordered(numbers: &[i64]) -> Result<Self, DomainError> {
        if numbers.len() != PICK {
            return Err(DomainError::WrongCount {
                count: numbers.len(),
            });
        }
        let mut sorted = [0u8; PICK];
        for (slot, &number) in sorted.iter_mut().zip(numbers) {
            if !(1..=NUMBERS as i64).contains(&number) {
                return Err(DomainError::NumberOutOfRange { number });
            }
            *slot = number as u8;
        }
        sorted.sort_unstable();
        Self::new(&sorted)
    }

    /// Decode a rank into its combination without visiting its predecessors.
    pub fn from_rank(rank: Rank) -> Result<Self, DomainError> {
        if rank >= TOTAL_COMBINATIONS {
            return Err(DomainError::RankOutOfBounds { rank });
        }
        let mut indices = [0usize; PICK];
        unrank_combination_into(NUMBERS, rank, &mut indices);
        Ok(Self::from_indices(&indices))
    }

    /// Lexicographic rank of this combination.
    pub fn rank(&self) -> Rank {
        rank_combination(NUMBERS, &self.indices())
    }

    /// The combination with rank 0: `01 02 ... 15`.
    pub fn first() -> Self {
        let mut array = [0u8; PICK];
        for (i, slot) in array.iter_mut().enumerate() {
            *slot = i as u8 + 1;
        }
        Self(array)
    }

    /// The combination with the highest rank: `11 12 ... 25`.
    pub fn last() -> Self {
        let mut array = [0u8; PICK];
        for (i, slot) in array.iter_mut().enumerate() {
            *slot = (NUMBERS - PICK + i) as u8 + 1;
        }
        Self(array)
    }

    /// The combination ranked right after this one, if any.
    pub fn successor(&self) -> Option<Self> {
        let mut indices = self.indices();
        next_combination(NUMBERS, &mut indices).then(|| Self::from_indices(&indices))
    }

    pub fn numbers(&self) -> &[u8; PICK] {
        &self.0
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    /// Bit `n - 1` is set for every number `n` in the combination.
    pub fn mask(&self) -> u32 {
        self.0.iter().fold(0, |mask, &n| mask | 1 << (n - 1))
    }

    /// Parse the display form, e.g. `01 02 03 04 05 06 07 08 09 10 11 12 13 14 15`.
    ///
    /// Numbers may be separated by any run of spaces or tabs, leading zeros are
    /// optional, and the numbers must be ascending. Returns `None` if the text is
    /// malformed or does not describe a valid combination.
    pub fn from_string(s: &str) -> Option<Self> {
        fn number(input: &mut &str) -> ModalResult<u8> {
            digit1.try_map(str::parse::<u8>).parse_next(input)
        }

        let mut input = s.trim();
        let numbers: Vec<u8> = terminated(separated(1.., number, space1), eof)
            .parse_next(&mut input)
            .ok()?;
        Self::new(&numbers).ok()
    }

    fn indices(&self) -> [usize; PICK] {
        self.0.map(|n| n as usize - 1)
    }

    fn from_indices(indices: &[usize; PICK]) -> Self {
        Self(indices.map(|i| i as u8 + 1))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, number) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02}", number)?;
        }
        Ok(())
    }
}

/// Decode a rank into its combination.
pub fn unrank(rank: Rank) -> Result<Combination, DomainError> {
    Combination::from_rank(rank)
}

/// Rank of a sorted list of 15 distinct numbers from `1..=25`.
pub fn rank(numbers: &[u8]) -> Result<Rank, DomainError> {
    Combination::new(numbers).map(|c| c.rank())
}
