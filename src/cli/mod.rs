mod annotate;
mod browse;
mod export;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use anyhow::Result;
use lotofacil::annotation::Annotations;
use lotofacil::combination::Rank;
use lotofacil::shards::DEFAULT_SHARD_SIZE;
use lotofacil::storage::{DuckDbStore, JsonFileStore, KeyValueStore, MemoryStore, load_preseeded};
use lotofacil::view::PAGE_SIZE;

const DEFAULT_DATA_DIR: &str = "./data/lotofacil";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding marks, history and shards.
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Where marks are persisted.
    #[arg(long, global = true, value_enum, default_value_t = Backend::Json)]
    backend: Backend,
    /// JSON array of historically drawn ranks, merged into the marks.
    /// Defaults to `history.json` in the data directory.
    #[arg(long, global = true)]
    history: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Json,
    Duckdb,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the combination with a given rank.
    Show {
        /// 0-based rank, e.g. `0` for `01 02 ... 15`.
        rank: Rank,
    },
    /// Print the rank of 15 numbers given in any order.
    Rank {
        #[arg(num_args = 1.., allow_negative_numbers = true)]
        numbers: Vec<i64>,
    },
    /// List one page of combinations.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Numbers every listed combination must contain, e.g. "1 2 3".
        #[arg(long)]
        filter: Option<String>,
        /// Only list combinations marked as drawn.
        #[arg(long)]
        only_marked: bool,
        #[arg(long, default_value_t = PAGE_SIZE)]
        limit: usize,
    },
    /// Scan the universe rank by rank for combinations containing given numbers.
    Scan {
        #[arg(long)]
        filter: String,
        /// Rank to start scanning from.
        #[arg(long, default_value_t = 0)]
        start: Rank,
        /// Stop after this many matches.
        #[arg(long, default_value_t = PAGE_SIZE)]
        max: usize,
        /// Give up after examining this many ranks. Budgets above 50000 are
        /// checked every 50000 ranks.
        #[arg(long)]
        budget: Option<usize>,
    },
    /// Toggle the drawn mark of a rank.
    Mark { rank: Rank },
    /// Remove marks. Historical draws are kept unless `--all` is given, which
    /// leaves them unmarked in later runs too.
    Clear {
        #[arg(long)]
        all: bool,
    },
    /// Mark every draw listed in a CSV export of the results spreadsheet.
    Import {
        path: PathBuf,
        /// Cell separator of the CSV file.
        #[arg(long, default_value_t = ',')]
        separator: char,
        /// Cells before the first ball in each row (contest number, date).
        #[arg(long, default_value_t = 2)]
        skip_columns: usize,
    },
    /// Write the universe as gzip-compressed JSON shards.
    ExportShards {
        /// Output directory. Defaults to `shards` in the data directory.
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_SHARD_SIZE)]
        shard_size: usize,
    },
    /// Check that ranking and unranking are inverse of each other.
    Verify {
        /// Number of strata to sample, one rank each.
        #[arg(long, default_value_t = 100_000)]
        samples: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Check every rank instead of sampling.
        #[arg(long)]
        exhaustive: bool,
    },
}

/// Settings shared by all subcommands.
pub(crate) struct Config {
    data_dir: PathBuf,
    backend: Backend,
    history: PathBuf,
}

impl Config {
    fn from_cli(cli: &Cli) -> Self {
        let history = cli
            .history
            .clone()
            .unwrap_or_else(|| cli.data_dir.join("history.json"));
        Self {
            data_dir: cli.data_dir.clone(),
            backend: cli.backend,
            history,
        }
    }

    /// Open the configured store. If it cannot be opened, marks are kept in
    /// memory for this run only.
    fn open_store(&self) -> Box<dyn KeyValueStore> {
        match self.backend {
            Backend::Json => Box::new(JsonFileStore::new(self.data_dir.join("marked.json"))),
            Backend::Duckdb => match DuckDbStore::open(self.data_dir.join("annotations.duckdb")) {
                Ok(store) => Box::new(store),
                Err(err) => {
                    eprintln!("Could not open DuckDB store ({err}); changes will not be saved.");
                    Box::new(MemoryStore::new())
                }
            },
        }
    }

    fn open_annotations(&self) -> Annotations<Box<dyn KeyValueStore>> {
        Annotations::open(self.open_store(), load_preseeded(&self.history))
    }
}

/// Parse CLI arguments and execute the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    match cli.command {
        Commands::Show { rank } => {
            browse::run_show(&config, rank)?;
        }
        Commands::Rank { numbers } => {
            browse::run_rank(&numbers)?;
        }
        Commands::List {
            page,
            filter,
            only_marked,
            limit,
        } => {
            browse::run_list(&config, page, filter.as_deref(), only_marked, limit)?;
        }
        Commands::Scan {
            filter,
            start,
            max,
            budget,
        } => {
            browse::run_scan(&filter, start, max, budget)?;
        }
        Commands::Mark { rank } => {
            annotate::run_mark(&config, rank)?;
        }
        Commands::Clear { all } => {
            annotate::run_clear(&config, all)?;
        }
        Commands::Import {
            path,
            separator,
            skip_columns,
        } => {
            annotate::run_import(&config, &path, separator, skip_columns)?;
        }
        Commands::ExportShards { dir, shard_size } => {
            let dir = dir.unwrap_or_else(|| config.data_dir.join("shards"));
            export::run_export_shards(&dir, shard_size)?;
        }
        Commands::Verify {
            samples,
            seed,
            exhaustive,
        } => {
            export::run_verify(samples, seed, exhaustive)?;
        }
    }

    Ok(())
}
