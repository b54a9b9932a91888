//! Precomputed combination listings split into fixed-size, gzip-compressed
//! JSON files, so a client can page through the universe by fetching one shard
//! at a time instead of computing combinations itself.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combination::{Combination, Rank, TOTAL_COMBINATIONS};
use crate::universe::slice;

pub const DEFAULT_SHARD_SIZE: usize = 100_000;

/// Consecutive combinations starting at rank `start`, in display form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    pub start: Rank,
    pub combinations: Vec<String>,
}

pub fn shard_count(shard_size: usize) -> usize {
    TOTAL_COMBINATIONS.div_ceil(shard_size.max(1))
}

/// Shard index holding `rank`, and the rank's position inside that shard.
pub fn shard_for_rank(rank: Rank, shard_size: usize) -> (usize, usize) {
    let shard_size = shard_size.max(1);
    (rank / shard_size, rank % shard_size)
}

pub fn shard_path<P: AsRef<Path>>(dir: P, index: usize) -> PathBuf {
    dir.as_ref().join(format!("shard-{:05}.json.gz", index))
}

pub fn build_shard(index: usize, shard_size: usize) -> Shard {
    let start = index * shard_size;
    Shard {
        start,
        combinations: slice(start, shard_size)
            .map(|combination| combination.to_string())
            .collect(),
    }
}

pub fn write_shard<P: AsRef<Path>>(path: P, shard: &Shard) -> io::Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, shard)?;
    encoder.finish()?;
    Ok(())
}

pub fn read_shard<P: AsRef<Path>>(dir: P, index: usize) -> io::Result<Shard> {
    let file = File::open(shard_path(dir, index))?;
    let decoder = MultiGzDecoder::new(BufReader::new(file));
    Ok(serde_json::from_reader(decoder)?)
}

/// Write every shard of the universe into `dir`, in parallel.
///
/// Returns the number of shards written.
pub fn write_shards<P: AsRef<Path>>(
    dir: P,
    shard_size: usize,
    progress: &ProgressBar,
) -> io::Result<usize> {
    let dir = dir.as_ref();
    let shard_size = shard_size.max(1);
    fs::create_dir_all(dir)?;
    let count = shard_count(shard_size);
    progress.set_length(count as u64);
    (0..count)
        .into_par_iter()
        .progress_with(progress.clone())
        .try_for_each(|index| write_shard(shard_path(dir, index), &build_shard(index, shard_size)))?;
    progress.finish();
    Ok(count)
}

/// Fetch the combination with the given rank from a directory of shards.
pub fn lookup<P: AsRef<Path>>(dir: P, shard_size: usize, rank: Rank) -> io::Result<Combination> {
    let (index, position) = shard_for_rank(rank, shard_size);
    let shard = read_shard(dir, index)?;
    if shard.start != rank - position {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "shard {} starts at rank {}, expected {}",
                index,
                shard.start,
                rank - position
            ),
        ));
    }
    let text = shard.combinations.get(position).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("rank {} is missing from shard {}", rank, index),
        )
    })?;
    Combination::from_string(text).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid combination in shard {}: {}", index, text),
        )
    })
}
