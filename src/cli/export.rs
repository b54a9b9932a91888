use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use anyhow::{Context, Result, bail};
use lotofacil::combination::TOTAL_COMBINATIONS;
use lotofacil::shards::write_shards;
use lotofacil::verify::{verify_exhaustive, verify_stratified};

fn progress_bar() -> Result<ProgressBar> {
    let progress = ProgressBar::new(0);
    progress.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
    )?);
    Ok(progress)
}

pub(crate) fn run_export_shards(dir: &Path, shard_size: usize) -> Result<()> {
    if shard_size == 0 {
        bail!("shard size must be positive");
    }
    let progress = progress_bar()?;
    let count = write_shards(dir, shard_size, &progress)
        .with_context(|| format!("failed to write shards to {}", dir.display()))?;
    println!(
        "Wrote {} shards of up to {} combinations to {}",
        count,
        shard_size,
        dir.display()
    );
    Ok(())
}

pub(crate) fn run_verify(samples: usize, seed: u64, exhaustive: bool) -> Result<()> {
    let failures = if exhaustive {
        let progress = progress_bar()?;
        println!("Checking all {} ranks...", TOTAL_COMBINATIONS);
        verify_exhaustive(&progress)
    } else {
        println!("Checking {} stratified samples (seed {})...", samples, seed);
        verify_stratified(samples, seed)
    };

    if let Some(first) = failures.first() {
        bail!(
            "{} ranks failed the round trip, first at rank {}",
            failures.len(),
            first
        );
    }
    println!("All checked ranks round-trip.");
    Ok(())
}
