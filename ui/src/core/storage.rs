//! File formats for the snapshot (`tests.json`) and history (`history.json`)
//! payloads, shared by the writer (fetch command) and the readers (page).

use std::path::{Path, PathBuf};

use super::history::HistoryStore;
use super::model::TestSummary;

pub const SNAPSHOT_FILE: &str = "tests.json";
pub const HISTORY_FILE: &str = "history.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            what: what.into(),
            source,
        }
    }
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<TestSummary>, StorageError> {
    serde_json::from_slice(bytes).map_err(|err| StorageError::json(SNAPSHOT_FILE, err))
}

pub fn decode_history(bytes: &[u8]) -> Result<HistoryStore, StorageError> {
    serde_json::from_slice(bytes).map_err(|err| StorageError::json(HISTORY_FILE, err))
}

pub fn encode_snapshot(summaries: &[TestSummary]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(summaries).map_err(|err| StorageError::json(SNAPSHOT_FILE, err))
}

pub fn encode_history(store: &HistoryStore) -> Result<String, StorageError> {
    serde_json::to_string_pretty(store).map_err(|err| StorageError::json(HISTORY_FILE, err))
}

/// Read a file, mapping "not found" to `None` and every other failure to an error.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::io(path, err)),
    }
}

/// A missing history file is an empty store.
pub fn read_history_file(path: &Path) -> Result<HistoryStore, StorageError> {
    match read_optional(path)? {
        Some(bytes) => decode_history(&bytes),
        None => Ok(HistoryStore::default()),
    }
}

/// A missing snapshot file means no tests yet.
pub fn read_snapshot_file(path: &Path) -> Result<Vec<TestSummary>, StorageError> {
    match read_optional(path)? {
        Some(bytes) => decode_snapshot(&bytes),
        None => Ok(Vec::new()),
    }
}
