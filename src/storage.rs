//! Persistence of the marked set.
//!
//! The marked set lives in a string-keyed store under [`MARKED_KEY`] as a JSON
//! array of 0-based ranks. Historical draws the user unmarked are kept under
//! [`DISMISSED_KEY`] in the same form. Loading never fails: an unreachable
//! store or garbage under a key degrades to an empty set with a warning.
//!
//! The browser version kept 1-based ids under `lotofacilSorteadas`. That key
//! is never read here, so old data cannot be misread as ranks.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use duckdb::{Connection, params};

use crate::combination::{Rank, TOTAL_COMBINATIONS};
use crate::error::StorageError;

/// Key under which the marked ranks are stored.
pub const MARKED_KEY: &str = "lotofacilMarkedRanks";
/// Key under which preseeded ranks the user unmarked are stored.
pub const DISMISSED_KEY: &str = "lotofacilDismissedRanks";

/// A persistent string-keyed store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Store that forgets everything when dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys kept in one JSON object on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(unavailable(&self.path, err)),
        };
        serde_json::from_str(&text)
            .map_err(|err| StorageError::Malformed(format!("{}: {}", self.path.display(), err)))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| unavailable(&self.path, err))?;
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|err| StorageError::Malformed(err.to_string()))?;
        fs::write(&self.path, text).map_err(|err| unavailable(&self.path, err))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

fn unavailable(path: &Path, err: io::Error) -> StorageError {
    StorageError::Unavailable(format!("{}: {}", path.display(), err))
}

/// Keys kept in a `kv` table of a DuckDB database.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| unavailable(path, err))?;
        }
        let conn = Connection::open(path).map_err(duckdb_unavailable)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory().map_err(duckdb_unavailable)?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key VARCHAR,
                value VARCHAR
            )",
            [],
        )
        .map_err(duckdb_unavailable)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for DuckDbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.conn.query_row(
            "SELECT value FROM kv WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(duckdb_unavailable(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.remove(key)?;
        self.conn
            .execute("INSERT INTO kv (key, value) VALUES (?, ?)", params![key, value])
            .map_err(duckdb_unavailable)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?", params![key])
            .map_err(duckdb_unavailable)?;
        Ok(())
    }
}

fn duckdb_unavailable(err: duckdb::Error) -> StorageError {
    StorageError::Unavailable(err.to_string())
}

/// Decode a JSON array of ranks, dropping ranks outside the universe.
///
/// Returns the valid ranks and how many were dropped.
fn parse_ranks(text: &str) -> Result<(BTreeSet<Rank>, usize), StorageError> {
    let ranks: Vec<Rank> =
        serde_json::from_str(text).map_err(|err| StorageError::Malformed(err.to_string()))?;
    let (valid, invalid): (Vec<Rank>, Vec<Rank>) = ranks
        .into_iter()
        .partition(|&rank| rank < TOTAL_COMBINATIONS);
    Ok((valid.into_iter().collect(), invalid.len()))
}

/// Read the ranks stored under `key`, failing on any storage problem.
pub fn try_load_ranks<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<BTreeSet<Rank>, StorageError> {
    let Some(text) = store.get(key)? else {
        return Ok(BTreeSet::new());
    };
    let (ranks, _) = parse_ranks(&text)?;
    Ok(ranks)
}

/// Read the ranks stored under `key`, or an empty set if the store is unusable.
pub fn load_ranks<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> BTreeSet<Rank> {
    match try_load_ranks(store, key) {
        Ok(ranks) => ranks,
        Err(err) => {
            eprintln!("Ignoring stored {key} ({err}); starting with none.");
            BTreeSet::new()
        }
    }
}

/// Store `ranks` under `key`. An empty set removes the key.
pub fn save_ranks<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    ranks: &BTreeSet<Rank>,
) -> Result<(), StorageError> {
    if ranks.is_empty() {
        return store.remove(key);
    }
    let text =
        serde_json::to_string(ranks).map_err(|err| StorageError::Malformed(err.to_string()))?;
    store.set(key, &text)
}

pub fn try_load_marked<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<BTreeSet<Rank>, StorageError> {
    try_load_ranks(store, MARKED_KEY)
}

/// Read the persisted marked set, or an empty one if the store is unusable.
pub fn load_marked<S: KeyValueStore + ?Sized>(store: &S) -> BTreeSet<Rank> {
    load_ranks(store, MARKED_KEY)
}

pub fn save_marked<S: KeyValueStore + ?Sized>(
    store: &mut S,
    marked: &BTreeSet<Rank>,
) -> Result<(), StorageError> {
    save_ranks(store, MARKED_KEY, marked)
}

/// Load the list of historically drawn ranks from a JSON array file.
///
/// A missing file means no history. An unreadable or malformed file is reported
/// and treated as empty; out-of-range ranks are reported and skipped.
pub fn load_preseeded<P: AsRef<Path>>(path: P) -> BTreeSet<Rank> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return BTreeSet::new(),
        Err(err) => {
            eprintln!("Ignoring draw history {}: {}", path.display(), err);
            return BTreeSet::new();
        }
    };
    match parse_ranks(&text) {
        Ok((ranks, dropped)) => {
            if dropped > 0 {
                eprintln!(
                    "Skipped {} out-of-range ranks in {}.",
                    dropped,
                    path.display()
                );
            }
            ranks
        }
        Err(err) => {
            eprintln!("Ignoring draw history {}: {}", path.display(), err);
            BTreeSet::new()
        }
    }
}
