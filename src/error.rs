use std::fmt;

/// A rank or a set of numbers that does not describe a valid combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// The rank is not below the number of combinations.
    RankOutOfBounds { rank: usize },
    /// The input does not hold exactly 15 numbers.
    WrongCount { count: usize },
    /// A number lies outside `1..=25`.
    NumberOutOfRange { number: i64 },
    /// A number appears more than once.
    Duplicate { number: u8 },
    /// The numbers are distinct but not given in ascending order.
    NotAscending,
    /// A filter asks for more numbers than a combination holds.
    TooManyRequired { count: usize },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::RankOutOfBounds { rank } => {
                write!(f, "rank {} is out of bounds", rank)
            }
            DomainError::WrongCount { count } => {
                write!(f, "expected 15 numbers, got {}", count)
            }
            DomainError::NumberOutOfRange { number } => {
                write!(f, "number {} is outside 1..=25", number)
            }
            DomainError::Duplicate { number } => {
                write!(f, "number {} appears more than once", number)
            }
            DomainError::NotAscending => write!(f, "numbers are not in ascending order"),
            DomainError::TooManyRequired { count } => {
                write!(f, "a filter can require at most 15 numbers, got {}", count)
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// Failure of the persistent key-value collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The store could not be reached, opened or written.
    Unavailable(String),
    /// The store answered, but the stored value could not be decoded.
    Malformed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(reason) => write!(f, "storage unavailable: {}", reason),
            StorageError::Malformed(reason) => write!(f, "malformed stored data: {}", reason),
        }
    }
}

impl std::error::Error for StorageError {}

/// Why a row of an imported draw history was skipped.
///
/// These are never raised to the caller; they only feed the counters of an
/// [`ImportReport`](crate::annotation::ImportReport).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ImportRowError {
    WrongCount,
    OutOfRange,
    Duplicate,
}

impl From<DomainError> for ImportRowError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NumberOutOfRange { .. } => ImportRowError::OutOfRange,
            DomainError::Duplicate { .. } => ImportRowError::Duplicate,
            _ => ImportRowError::WrongCount,
        }
    }
}

/// Failure of an annotation change: either the request was invalid or the
/// change was applied in memory but could not be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationError {
    Domain(DomainError),
    Storage(StorageError),
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationError::Domain(err) => write!(f, "{}", err),
            AnnotationError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AnnotationError {}

impl From<DomainError> for AnnotationError {
    fn from(err: DomainError) -> Self {
        AnnotationError::Domain(err)
    }
}

impl From<StorageError> for AnnotationError {
    fn from(err: StorageError) -> Self {
        AnnotationError::Storage(err)
    }
}
