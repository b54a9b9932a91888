use std::fmt;

use crate::annotation::MarkedSet;
use crate::combination::{Combination, Rank};
use crate::filter::Filter;
use crate::universe::slice;

/// Rows per page of a listing.
pub const PAGE_SIZE: usize = 100;

/// What a listing shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: Filter,
    /// Restrict the listing to marked combinations.
    pub only_marked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Row {
    pub rank: Rank,
    pub combination: Combination,
    pub marked: bool,
}

impl Row {
    /// 1-based number shown to users.
    pub fn id(&self) -> usize {
        self.rank + 1
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7}  {}", self.id(), self.combination)?;
        if self.marked {
            write!(f, "  drawn")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<Row>,
    /// Position of the first row among all rows of the listing.
    pub offset: usize,
    /// Rows of the listing up to and including this page.
    pub shown: usize,
    /// Rows of the whole listing.
    pub total: usize,
}

impl Page {
    /// Offset of the following page, if the listing continues.
    pub fn next_offset(&self) -> Option<usize> {
        (self.shown < self.total).then_some(self.shown)
    }

    /// `shown/total`, as displayed under the listing.
    pub fn counter(&self) -> String {
        format!("{}/{}", self.shown, self.total)
    }
}

/// One page of the listing described by `query`, starting `offset` rows in.
///
/// Filtered listings jump straight to their `offset`-th match, so late pages
/// cost the same as the first one.
pub fn page(query: &ViewQuery, marked: &MarkedSet, offset: usize, limit: usize) -> Page {
    let row = |rank: Rank, combination: Combination| Row {
        rank,
        combination,
        marked: marked.is_marked(rank),
    };

    let (rows, total): (Vec<Row>, usize) = if query.only_marked {
        let matching: Vec<(Rank, Combination)> = marked
            .iter()
            .filter_map(|rank| Combination::from_rank(rank).ok().map(|c| (rank, c)))
            .filter(|(_, combination)| query.filter.matches(combination))
            .collect();
        let rows = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|&(rank, combination)| row(rank, combination))
            .collect();
        (rows, matching.len())
    } else if query.filter.is_empty() {
        let rows = slice(offset, limit)
            .enumerate()
            .map(|(i, combination)| row(offset + i, combination))
            .collect();
        (rows, query.filter.match_count())
    } else {
        let total = query.filter.match_count();
        let rows = (offset..offset.saturating_add(limit).min(total))
            .filter_map(|n| query.filter.nth_match(n))
            .map(|combination| row(combination.rank(), combination))
            .collect();
        (rows, total)
    };

    let shown = offset.saturating_add(rows.len()).min(total);
    Page {
        rows,
        offset,
        shown,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::TOTAL_COMBINATIONS;
    use crate::universe::filter_scan;
    use insta::assert_snapshot;
    use std::collections::BTreeSet;

    fn marked(ranks: &[Rank]) -> MarkedSet {
        MarkedSet::load(ranks.iter().copied().collect(), BTreeSet::new())
    }

    #[test]
    fn first_page_of_universe() {
        let marks = marked(&[1]);
        let page = page(&ViewQuery::default(), &marks, 0, 3);
        let rendered: Vec<String> = page.rows.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "      1  01 02 03 04 05 06 07 08 09 10 11 12 13 14 15",
                "      2  01 02 03 04 05 06 07 08 09 10 11 12 13 14 16  drawn",
                "      3  01 02 03 04 05 06 07 08 09 10 11 12 13 14 17",
            ]
        );
        assert_snapshot!(page.rows[1].combination, @"01 02 03 04 05 06 07 08 09 10 11 12 13 14 16");
        assert_eq!(page.counter(), format!("3/{}", TOTAL_COMBINATIONS));
        assert_eq!(page.next_offset(), Some(3));
    }

    #[test]
    fn last_page_of_universe() {
        let page = page(
            &ViewQuery::default(),
            &MarkedSet::default(),
            TOTAL_COMBINATIONS - 10,
            PAGE_SIZE,
        );
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[9].combination, Combination::last());
        assert_eq!(page.next_offset(), None);
    }

    #[test]
    fn filtered_pages_follow_scan_order() {
        let filter = Filter::new(&[1, 2, 3]).unwrap();
        let query = ViewQuery {
            filter,
            only_marked: false,
        };
        let first = page(&query, &MarkedSet::default(), 0, PAGE_SIZE);
        let second = page(&query, &MarkedSet::default(), PAGE_SIZE, PAGE_SIZE);
        let scanned: Vec<Rank> = filter_scan(|c| filter.matches(c), 0, 2 * PAGE_SIZE)
            .map(|(rank, _)| rank)
            .collect();
        let paged: Vec<Rank> = first
            .rows
            .iter()
            .chain(&second.rows)
            .map(|row| row.rank)
            .collect();
        assert_eq!(paged, scanned);
        assert_eq!(second.counter(), format!("200/{}", filter.match_count()));
    }

    #[test]
    fn only_marked_respects_filter() {
        let with_25 = Combination::last().rank();
        let marks = marked(&[0, 5, with_25]);
        let query = ViewQuery {
            filter: Filter::new(&[25]).unwrap(),
            only_marked: true,
        };
        let page = page(&query, &marks, 0, PAGE_SIZE);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].rank, with_25);
        assert!(page.rows[0].marked);
        assert_eq!(page.counter(), "1/1");
    }

    #[test]
    fn only_marked_paginates() {
        let marks = marked(&(0..250).collect::<Vec<_>>());
        let query = ViewQuery {
            filter: Filter::default(),
            only_marked: true,
        };
        let third = page(&query, &marks, 2 * PAGE_SIZE, PAGE_SIZE);
        assert_eq!(third.rows.len(), 50);
        assert_eq!(third.rows[0].rank, 200);
        assert_eq!(third.counter(), "250/250");
        assert_eq!(third.next_offset(), None);
    }

    #[test]
    fn offset_past_the_end_is_empty() {
        let page = page(
            &ViewQuery::default(),
            &MarkedSet::default(),
            TOTAL_COMBINATIONS + 5,
            PAGE_SIZE,
        );
        assert!(page.rows.is_empty());
        assert_eq!(page.shown, TOTAL_COMBINATIONS);
    }
}
