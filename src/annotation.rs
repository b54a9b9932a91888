use std::collections::BTreeSet;

use crate::combination::{Combination, Rank, TOTAL_COMBINATIONS};
use crate::error::{AnnotationError, DomainError, ImportRowError, StorageError};
use crate::storage::{
    DISMISSED_KEY, KeyValueStore, load_marked, load_ranks, save_marked, save_ranks,
};

/// What [`MarkedSet::clear`] leaves behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearMode {
    /// Drop user marks but keep the historically drawn ranks.
    KeepPreseeded,
    /// Drop everything, historical draws included.
    All,
}

/// Aggregate outcome of reconciling an imported draw history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub newly_marked: usize,
    pub already_marked: usize,
    pub wrong_count: usize,
    pub out_of_range: usize,
    pub duplicates: usize,
}

impl ImportReport {
    /// Rows that did not describe a valid combination.
    pub fn skipped(&self) -> usize {
        self.wrong_count + self.out_of_range + self.duplicates
    }

    fn record_skip(&mut self, err: ImportRowError) {
        match err {
            ImportRowError::WrongCount => self.wrong_count += 1,
            ImportRowError::OutOfRange => self.out_of_range += 1,
            ImportRowError::Duplicate => self.duplicates += 1,
        }
    }
}

/// Ranks flagged as drawn.
///
/// Preseeded ranks the user unmarks are remembered as dismissed, so that
/// reloading the same history does not mark them again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkedSet {
    marked: BTreeSet<Rank>,
    preseeded: BTreeSet<Rank>,
    dismissed: BTreeSet<Rank>,
}

impl MarkedSet {
    /// Union of the persisted marks and the preseeded history.
    pub fn load(persisted: BTreeSet<Rank>, preseeded: BTreeSet<Rank>) -> Self {
        Self::restore(persisted, preseeded, BTreeSet::new())
    }

    /// Like [`load`](Self::load), leaving out the preseeded ranks in `dismissed`.
    pub fn restore(
        persisted: BTreeSet<Rank>,
        preseeded: BTreeSet<Rank>,
        dismissed: BTreeSet<Rank>,
    ) -> Self {
        let dismissed: BTreeSet<Rank> = dismissed.intersection(&preseeded).copied().collect();
        let mut marked = persisted;
        marked.extend(preseeded.difference(&dismissed).copied());
        Self {
            marked,
            preseeded,
            dismissed,
        }
    }

    pub fn is_marked(&self, rank: Rank) -> bool {
        self.marked.contains(&rank)
    }

    pub fn is_preseeded(&self, rank: Rank) -> bool {
        self.preseeded.contains(&rank)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    pub fn ranks(&self) -> &BTreeSet<Rank> {
        &self.marked
    }

    /// Preseeded ranks that are currently unmarked.
    pub fn dismissed(&self) -> &BTreeSet<Rank> {
        &self.dismissed
    }

    /// Marked ranks in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = Rank> + '_ {
        self.marked.iter().copied()
    }

    /// Flip the mark on `rank` and return whether it is now marked.
    pub fn toggle(&mut self, rank: Rank) -> Result<bool, DomainError> {
        if rank >= TOTAL_COMBINATIONS {
            return Err(DomainError::RankOutOfBounds { rank });
        }
        if self.marked.remove(&rank) {
            if self.preseeded.contains(&rank) {
                self.dismissed.insert(rank);
            }
            Ok(false)
        } else {
            self.mark(rank);
            Ok(true)
        }
    }

    /// Mark every valid row of an imported draw history.
    ///
    /// Each row holds the drawn numbers in any order. Rows that are not 15
    /// distinct numbers in `1..=25` are skipped without error. Returns how many
    /// ranks were not marked before.
    pub fn reconcile_import<I, R>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[i64]>,
    {
        self.reconcile_import_report(rows).newly_marked
    }

    /// Like [`reconcile_import`](Self::reconcile_import) but with the full tally.
    pub fn reconcile_import_report<I, R>(&mut self, rows: I) -> ImportReport
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[i64]>,
    {
        let mut report = ImportReport::default();
        for row in rows {
            match Combination::from_unordered(row.as_ref()) {
                Ok(combination) => {
                    if self.mark(combination.rank()) {
                        report.newly_marked += 1;
                    } else {
                        report.already_marked += 1;
                    }
                }
                Err(err) => report.record_skip(err.into()),
            }
        }
        report
    }

    pub fn clear(&mut self, mode: ClearMode) {
        match mode {
            ClearMode::KeepPreseeded => {
                self.marked = self.preseeded.clone();
                self.dismissed.clear();
            }
            ClearMode::All => {
                self.marked.clear();
                self.dismissed = self.preseeded.clone();
            }
        }
    }

    /// Returns whether `rank` was not marked before.
    fn mark(&mut self, rank: Rank) -> bool {
        self.dismissed.remove(&rank);
        self.marked.insert(rank)
    }
}

/// A [`MarkedSet`] bound to the store it is persisted in.
///
/// Every mutation is written back before returning. A storage failure leaves
/// the in-memory change in place and is reported to the caller.
pub struct Annotations<S> {
    marked: MarkedSet,
    store: S,
}

impl<S: KeyValueStore> Annotations<S> {
    /// Load the persisted marks from `store` and merge in `preseeded`, minus
    /// the preseeded ranks dismissed in earlier sessions.
    pub fn open(store: S, preseeded: BTreeSet<Rank>) -> Self {
        let persisted = load_marked(&store);
        let dismissed = load_ranks(&store, DISMISSED_KEY);
        Self {
            marked: MarkedSet::restore(persisted, preseeded, dismissed),
            store,
        }
    }

    pub fn marked(&self) -> &MarkedSet {
        &self.marked
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn toggle(&mut self, rank: Rank) -> Result<bool, AnnotationError> {
        let now_marked = self.marked.toggle(rank)?;
        self.persist()?;
        Ok(now_marked)
    }

    pub fn import<I, R>(&mut self, rows: I) -> Result<ImportReport, StorageError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[i64]>,
    {
        let report = self.marked.reconcile_import_report(rows);
        self.persist()?;
        Ok(report)
    }

    pub fn clear(&mut self, mode: ClearMode) -> Result<(), StorageError> {
        self.marked.clear(mode);
        self.persist()
    }

    /// Empty sets remove their key.
    fn persist(&mut self) -> Result<(), StorageError> {
        save_marked(&mut self.store, self.marked.ranks())?;
        save_ranks(&mut self.store, DISMISSED_KEY, self.marked.dismissed())
    }
}
