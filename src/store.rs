use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::schema::{QuestionRecord, QuizCollection};
use crate::util;

/// Errors raised while reading or writing the persisted collection.
///
/// These are returned to the caller, which decides severity: the
/// collector treats a failed load as "start empty" and a failed save
/// as non-fatal, the analyzer may turn either into an exit code.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode collection: {0}")]
    Encode(#[from] serde_json::Error),
}

// ------------------------------------------------------------
// Uniqueness index
// ------------------------------------------------------------
//
// Insertion-ordered map keyed by `QuestionRecord::key`.
//
// INVARIANTS:
// - No two entries share a key
// - Entries are never replaced once inserted
// - `merge` is the only way records get in
//
#[derive(Debug, Default, Clone)]
pub struct QuizIndex {
    records: Vec<QuestionRecord>,
    positions: HashMap<String, usize>,
}

impl QuizIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every record whose key is not yet present.
    ///
    /// Returns how many records were actually added. Duplicates, both
    /// against the index and within `batch`, are dropped.
    pub fn merge<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = QuestionRecord>,
    {
        let mut added = 0;
        for record in batch {
            let key = record.key();
            if self.positions.contains_key(&key) {
                continue;
            }
            self.positions.insert(key, self.records.len());
            self.records.push(record);
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&QuestionRecord> {
        self.positions.get(key).map(|&i| &self.records[i])
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// Build the persisted shape, stamping `last_updated` with `now`.
    pub fn to_collection(&self, now: String) -> QuizCollection {
        QuizCollection {
            total_unique: self.records.len(),
            last_updated: now,
            quizzes: self.records.clone(),
        }
    }
}

impl From<QuizCollection> for QuizIndex {
    /// Rebuilds the index from a persisted collection.
    ///
    /// `total_unique` from the file is ignored; the count is always
    /// recomputed from the records themselves.
    fn from(collection: QuizCollection) -> Self {
        let mut index = QuizIndex::new();
        index.merge(collection.quizzes);
        index
    }
}

// ------------------------------------------------------------
// Persistence seam
// ------------------------------------------------------------
//
// The collector only talks to storage through this trait so tests
// can observe (and count) persistence without touching disk.
//
pub trait CollectionStore: Send + Sync {
    /// Where the collection lives, for log output.
    fn location(&self) -> String;

    /// Load the prior collection. A store with nothing saved yet
    /// returns an empty index, not an error.
    fn load(&self) -> Result<QuizIndex, StoreError>;

    /// Overwrite the stored collection with the full index.
    fn save(&self, index: &QuizIndex) -> Result<QuizCollection, StoreError>;
}

/// Pretty-printed JSON file store.
///
/// Writes go to a sibling `*.tmp` file which is then renamed over the
/// target, so an interrupted write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CollectionStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<QuizIndex, StoreError> {
        match read_collection(&self.path)? {
            Some(collection) => Ok(QuizIndex::from(collection)),
            None => Ok(QuizIndex::new()),
        }
    }

    fn save(&self, index: &QuizIndex) -> Result<QuizCollection, StoreError> {
        let collection = index.to_collection(util::now_iso());
        let json = serde_json::to_string_pretty(&collection)?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        Ok(collection)
    }
}

/// Read a persisted collection from `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_collection(path: &Path) -> Result<Option<QuizCollection>, StoreError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
