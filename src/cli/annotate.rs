use std::path::Path;

use super::Config;
use anyhow::{Context, Result, bail};
use lotofacil::annotation::ClearMode;
use lotofacil::combination::{Combination, Rank};
use lotofacil::history_import::{RowLayout, load_history};

pub(crate) fn run_mark(config: &Config, rank: Rank) -> Result<()> {
    let mut annotations = config.open_annotations();
    let marked = annotations.toggle(rank)?;
    let combination = Combination::from_rank(rank)?;
    if marked {
        println!("Marked #{} ({}) as drawn.", rank + 1, combination);
    } else {
        println!("Unmarked #{} ({}).", rank + 1, combination);
    }
    Ok(())
}

pub(crate) fn run_clear(config: &Config, all: bool) -> Result<()> {
    let mut annotations = config.open_annotations();
    let mode = if all {
        ClearMode::All
    } else {
        ClearMode::KeepPreseeded
    };
    annotations.clear(mode)?;
    println!(
        "Cleared marks ({} remaining).",
        annotations.marked().len()
    );
    Ok(())
}

pub(crate) fn run_import(
    config: &Config,
    path: &Path,
    separator: char,
    skip_columns: usize,
) -> Result<()> {
    if !separator.is_ascii() {
        bail!("separator must be a single ASCII character");
    }
    let layout = RowLayout {
        skip_columns,
        ..RowLayout::default()
    };
    let rows = load_history(path, separator as u8, layout)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut annotations = config.open_annotations();
    let report = annotations.import(&rows)?;

    println!(
        "Marked {} combinations as drawn ({} already marked).",
        report.newly_marked, report.already_marked
    );
    if report.skipped() > 0 {
        eprintln!(
            "Skipped {} rows in {} ({} with the wrong count, {} out of range, {} with duplicates).",
            report.skipped(),
            path.display(),
            report.wrong_count,
            report.out_of_range,
            report.duplicates
        );
    }
    Ok(())
}
