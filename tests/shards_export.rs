use std::fs;

use indicatif::ProgressBar;
use lotofacil::{
    combination::{Combination, TOTAL_COMBINATIONS},
    shards::{lookup, read_shard, shard_count, write_shards},
};

#[test]
#[ignore]
fn export_whole_universe() {
    let dir = std::env::temp_dir().join(format!("lotofacil-all-shards-{}", std::process::id()));
    let shard_size = 500_000;
    let written = write_shards(&dir, shard_size, &ProgressBar::hidden()).unwrap();
    assert_eq!(written, shard_count(shard_size));

    let total: usize = (0..written)
        .map(|index| read_shard(&dir, index).unwrap().combinations.len())
        .sum();
    assert_eq!(total, TOTAL_COMBINATIONS);

    for rank in [0, 499_999, 500_000, TOTAL_COMBINATIONS - 1] {
        assert_eq!(
            lookup(&dir, shard_size, rank).unwrap(),
            Combination::from_rank(rank).unwrap()
        );
    }
    fs::remove_dir_all(dir).unwrap();
}
