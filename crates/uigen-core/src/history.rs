//! Prompt history
//!
//! An audit trail of successful config generations. Writes happen on a
//! background task after the result is returned; a failing store never
//! affects the caller. `Orchestrator::flush_history` waits for queued writes
//! before shutdown.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uigen_schema::ArtifactKind;
use uuid::Uuid;

/// One successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Record id
    pub id: Uuid,
    /// When the result was accepted
    pub created_at: DateTime<Utc>,
    /// Config kind
    pub kind: ArtifactKind,
    /// User intent
    pub intent: String,
    /// State before the request
    pub previous: Value,
    /// Accepted state
    pub result: Value,
    /// Attempts the request needed
    pub attempts_used: u32,
}

impl HistoryRecord {
    /// Create record stamped now
    #[must_use]
    pub fn new(kind: ArtifactKind, intent: impl Into<String>, previous: Value, result: Value, attempts_used: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            kind,
            intent: intent.into(),
            previous,
            result,
            attempts_used,
        }
    }
}

/// History store errors
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// File could not be read or written
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded
    #[error("history serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored line is not a record
    #[error("corrupt history record on line {line}: {message}")]
    Corrupt {
        /// 1-based line number
        line: usize,
        /// Parser message
        message: String,
    },
}

/// Append-only history sink
#[async_trait]
pub trait PromptHistory: Send + Sync {
    /// Persist one record
    ///
    /// # Errors
    /// `HistoryError` when the record could not be stored.
    async fn append(&self, record: HistoryRecord) -> Result<(), HistoryError>;
}

/// Process-local history, mostly for tests and the CLI's dry runs
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl InMemoryHistory {
    /// Create empty history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored records, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().clone()
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl PromptHistory for InMemoryHistory {
    async fn append(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// One JSON record per line in a local file
#[derive(Debug)]
pub struct JsonlHistory {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlHistory {
    /// Create store backed by `path`; the file is created on first append
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record, oldest first
    ///
    /// A missing file is an empty history. Blank lines are skipped.
    ///
    /// # Errors
    /// `Io` on read failure, `Corrupt` for a line that is not a record.
    pub async fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| HistoryError::Corrupt {
                    line: i + 1,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl PromptHistory for JsonlHistory {
    async fn append(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(id = %record.id, path = %self.path.display(), "history record appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(intent: &str) -> HistoryRecord {
        HistoryRecord::new(
            ArtifactKind::Progress,
            intent,
            json!({"value": 10, "max": 100}),
            json!({"value": 40, "max": 100}),
            1,
        )
    }

    #[tokio::test]
    async fn in_memory_keeps_order() {
        let history = InMemoryHistory::new();
        history.append(record("first")).await.unwrap();
        history.append(record("second")).await.unwrap();

        let intents: Vec<_> = history.records().into_iter().map(|r| r.intent).collect();
        assert_eq!(intents, vec!["first", "second"]);
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn jsonl_round_trips_records() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonlHistory::new(dir.path().join("nested").join("history.jsonl"));

        let first = record("make it 40%");
        history.append(first.clone()).await.unwrap();
        history.append(record("again")).await.unwrap();

        let loaded = history.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], first);
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonlHistory::new(dir.path().join("absent.jsonl"));
        assert!(history.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        tokio::fs::write(&path, "\nnot json\n").await.unwrap();

        let err = JsonlHistory::new(&path).load().await.unwrap_err();
        assert!(matches!(err, HistoryError::Corrupt { line: 2, .. }));
    }
}
