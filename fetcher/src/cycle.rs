//! One fetch → transform → persist cycle.

use ui::core::history::{CycleOutcome, HistoryStore};
use ui::core::snapshot::{self, RawTests};
use ui::core::storage::{encode_history, encode_snapshot, StorageError};
use ui::core::timing;

use crate::source::{self, FetchError};
use crate::storage::{self, DataFiles};

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Summary of a finished cycle, logged as one line by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub tests: usize,
    pub outcome: CycleOutcome,
    pub snapshot_written: bool,
    pub history_written: bool,
}

impl CycleReport {
    pub fn log(&self) {
        tracing::info!(
            tests = self.tests,
            points_added = self.outcome.points_added,
            points_evicted = self.outcome.points_evicted,
            pruned = self.outcome.tests_pruned,
            snapshot_written = self.snapshot_written,
            history_written = self.history_written,
            "cycle complete"
        );
    }
}

/// Fetch the active tests while the previous history loads, then fold and
/// persist. A failure on either side aborts before anything is written.
pub async fn run(
    client: &reqwest::Client,
    api_url: &str,
    files: &DataFiles,
    dry_run: bool,
) -> Result<CycleReport, CycleError> {
    let (raw, history) = tokio::join!(
        source::fetch_active_tests(client, api_url),
        storage::load_history(&files.history),
    );
    let raw = raw?;
    let history = history?;

    commit(&raw, history, files, timing::now_unix_seconds(), dry_run).await
}

/// Process a fetched payload against `history` and write the results.
///
/// The snapshot is always rewritten; the history file when the store
/// changed or does not exist yet. Both files are staged before either is
/// renamed into place, history first. With `dry_run` nothing touches the
/// disk.
pub async fn commit(
    raw: &RawTests,
    mut history: HistoryStore,
    files: &DataFiles,
    now_seconds: i64,
    dry_run: bool,
) -> Result<CycleReport, CycleError> {
    let summaries = snapshot::process(raw);
    let outcome = history.record_cycle(&summaries, now_seconds);
    let snapshot_json = encode_snapshot(&summaries)?;
    let history_exists = tokio::fs::try_exists(&files.history)
        .await
        .map_err(|err| StorageError::io(&files.history, err))?;
    let history_json = if outcome.changed() || !history_exists {
        Some(encode_history(&history)?)
    } else {
        None
    };

    if dry_run {
        tracing::info!(
            snapshot = %files.snapshot.display(),
            snapshot_bytes = snapshot_json.len(),
            history = %files.history.display(),
            history_bytes = history_json.as_ref().map(String::len),
            "dry run, skipping writes"
        );
        return Ok(CycleReport {
            tests: summaries.len(),
            outcome,
            snapshot_written: false,
            history_written: false,
        });
    }

    let staged_snapshot = storage::stage(&files.snapshot, &snapshot_json).await?;
    if let Some(json) = &history_json {
        let staged_history = match storage::stage(&files.history, json).await {
            Ok(staged) => staged,
            Err(err) => {
                staged_snapshot.discard().await;
                return Err(err.into());
            }
        };
        if let Err(err) = staged_history.commit().await {
            staged_snapshot.discard().await;
            return Err(err.into());
        }
    } else {
        tracing::debug!("history unchanged, not rewriting");
    }
    staged_snapshot.commit().await?;

    Ok(CycleReport {
        tests: summaries.len(),
        outcome,
        snapshot_written: true,
        history_written: history_json.is_some(),
    })
}
