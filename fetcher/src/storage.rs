//! Async file access for the fetch cycle.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ui::core::history::HistoryStore;
use ui::core::storage::{decode_history, StorageError, HISTORY_FILE, SNAPSHOT_FILE};

/// Locations of the two published files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub snapshot: PathBuf,
    pub history: PathBuf,
}

impl DataFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            snapshot: dir.join(SNAPSHOT_FILE),
            history: dir.join(HISTORY_FILE),
        }
    }
}

/// Missing file ⇒ empty store. Unreadable or malformed ⇒ error.
pub async fn load_history(path: &Path) -> Result<HistoryStore, StorageError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => decode_history(&bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no history yet, starting empty");
            Ok(HistoryStore::new())
        }
        Err(err) => Err(StorageError::io(path, err)),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Contents written to `<path>.tmp`, waiting to be renamed over `path`.
#[derive(Debug)]
#[must_use = "a staged write does nothing until committed"]
pub struct StagedWrite {
    tmp: PathBuf,
    target: PathBuf,
}

/// First half of an atomic write: put `contents` next to `path`.
pub async fn stage(path: &Path, contents: &str) -> Result<StagedWrite, StorageError> {
    let tmp = temp_path_for(path);
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|err| StorageError::io(&tmp, err))?;
    Ok(StagedWrite {
        tmp,
        target: path.to_path_buf(),
    })
}

impl StagedWrite {
    /// Rename into place; readers only ever see the old or the new contents.
    pub async fn commit(self) -> Result<(), StorageError> {
        if let Err(err) = tokio::fs::rename(&self.tmp, &self.target).await {
            let _ = tokio::fs::remove_file(&self.tmp).await;
            return Err(StorageError::io(&self.target, err));
        }
        Ok(())
    }

    pub async fn discard(self) {
        let _ = tokio::fs::remove_file(&self.tmp).await;
    }
}

pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
    stage(path, contents).await?.commit().await
}
