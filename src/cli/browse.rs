use indicatif::{ProgressBar, ProgressStyle};
use std::ops::ControlFlow;

use super::Config;
use anyhow::{Result, anyhow, bail};
use lotofacil::combination::{Combination, Rank, TOTAL_COMBINATIONS};
use lotofacil::filter::Filter;
use lotofacil::universe::{SCAN_BATCH, filter_scan_with};
use lotofacil::view::{ViewQuery, page};

pub(crate) fn run_show(config: &Config, rank: Rank) -> Result<()> {
    let combination = Combination::from_rank(rank)?;
    let annotations = config.open_annotations();
    let status = if annotations.marked().is_marked(rank) {
        "drawn"
    } else {
        "not drawn"
    };
    println!("#{} (rank {}): {} [{}]", rank + 1, rank, combination, status);
    Ok(())
}

pub(crate) fn run_rank(numbers: &[i64]) -> Result<()> {
    let combination = Combination::from_unordered(numbers)?;
    let rank = combination.rank();
    println!("{} has rank {} (#{})", combination, rank, rank + 1);
    Ok(())
}

pub(crate) fn run_list(
    config: &Config,
    page_number: usize,
    filter: Option<&str>,
    only_marked: bool,
    limit: usize,
) -> Result<()> {
    if page_number == 0 {
        bail!("pages are numbered from 1");
    }
    let filter = match filter {
        Some(text) => Filter::parse_loose(text)?,
        None => Filter::default(),
    };
    let annotations = config.open_annotations();
    let query = ViewQuery {
        filter,
        only_marked,
    };
    let offset = (page_number - 1)
        .checked_mul(limit)
        .ok_or_else(|| anyhow!("page {page_number} is out of range"))?;
    let page = page(&query, annotations.marked(), offset, limit);

    if !filter.is_empty() {
        println!("Filter: {}", filter);
    }
    if page.rows.is_empty() {
        println!("(no combinations)");
    }
    for row in &page.rows {
        println!("{row}");
    }
    println!("{}", page.counter());
    if page.next_offset().is_some() {
        println!("Next: --page {}", page_number + 1);
    }
    Ok(())
}

pub(crate) fn run_scan(filter: &str, start: Rank, max: usize, budget: Option<usize>) -> Result<()> {
    let filter = Filter::parse_loose(filter)?;
    let budget = budget.unwrap_or(usize::MAX);
    let progress = ProgressBar::new(TOTAL_COMBINATIONS.saturating_sub(start) as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} scanned {pos}/{len} ranks, {msg}")?,
    );

    let outcome = filter_scan_with(
        |combination| filter.matches(combination),
        start,
        max,
        scan_batch_size(budget),
        |step| {
            progress.set_position(step.scanned as u64);
            progress.set_message(format!("{} found", step.found));
            if step.scanned >= budget {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    );
    progress.finish_and_clear();

    for (rank, combination) in &outcome.matches {
        println!("{:>7}  {}", rank + 1, combination);
    }
    println!(
        "Found {} matches after scanning {} ranks.",
        outcome.matches.len(),
        outcome.scanned
    );
    if outcome.next_start < TOTAL_COMBINATIONS {
        println!("Resume with --start {}", outcome.next_start);
    }
    Ok(())
}

/// Ranks examined between two budget checks. Small budgets are checked exactly.
fn scan_batch_size(budget: usize) -> usize {
    budget.clamp(1, SCAN_BATCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_budgets_stop_the_scan_on_time() {
        let budget = 10;
        let outcome = filter_scan_with(
            |_| false,
            0,
            usize::MAX,
            scan_batch_size(budget),
            |step| {
                if step.scanned >= budget {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        assert!(outcome.cancelled);
        assert_eq!(outcome.scanned, budget);
    }

    #[test]
    fn batch_size_is_capped() {
        assert_eq!(scan_batch_size(0), 1);
        assert_eq!(scan_batch_size(10), 10);
        assert_eq!(scan_batch_size(usize::MAX), SCAN_BATCH);
    }
}
