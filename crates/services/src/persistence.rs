use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{mpsc, oneshot};

use quiz_core::model::ProgressSnapshot;
use storage::repository::LocalStorageRepository;

use crate::error::PersistenceError;

/// Local-storage key holding the in-progress quiz.
pub const PROGRESS_KEY: &str = "quizProgress";

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Reads and writes the progress snapshot under `PROGRESS_KEY`.
///
/// The `try_*` methods report failures; the plain methods log them at warn
/// level and carry on, which is what the quiz flow uses.
#[derive(Clone)]
pub struct SnapshotStore {
    repo: Arc<dyn LocalStorageRepository>,
    ttl: Duration,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(repo: Arc<dyn LocalStorageRepository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the snapshot cannot be encoded or written.
    pub async fn try_save(&self, snapshot: &ProgressSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(snapshot)?;
        self.repo.set_item(PROGRESS_KEY, &json).await?;
        Ok(())
    }

    pub async fn save(&self, snapshot: &ProgressSnapshot) {
        if let Err(err) = self.try_save(snapshot).await {
            tracing::warn!(error = %err, "failed to save quiz progress");
        }
    }

    /// Load the snapshot if one exists and is younger than the TTL at `now`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if storage fails or the entry is not a valid
    /// snapshot.
    pub async fn try_load(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<ProgressSnapshot>, PersistenceError> {
        let Some(json) = self.repo.get_item(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        let snapshot: ProgressSnapshot = serde_json::from_str(&json)?;
        if !snapshot.is_fresh(now, self.ttl) {
            tracing::debug!(saved_at = %snapshot.saved_at, "ignoring stale quiz progress");
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    /// Like `try_load`, treating every failure as "nothing stored".
    pub async fn load(&self, now: DateTime<Utc>) -> Option<ProgressSnapshot> {
        match self.try_load(now).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load quiz progress");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns `PersistenceError` if the entry cannot be removed.
    pub async fn try_clear(&self) -> Result<(), PersistenceError> {
        self.repo.remove_item(PROGRESS_KEY).await?;
        Ok(())
    }

    pub async fn clear(&self) {
        if let Err(err) = self.try_clear().await {
            tracing::warn!(error = %err, "failed to clear quiz progress");
        }
    }
}

//
// ─── ORDERED WRITER ────────────────────────────────────────────────────────────
//

#[derive(Debug)]
enum WriteCommand {
    Save(Box<ProgressSnapshot>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget front for `SnapshotStore`.
///
/// Commands are applied one at a time by a single task, in the order they
/// were queued. The task exits once every writer handle is dropped.
#[derive(Clone, Debug)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl SnapshotWriter {
    /// Spawn the writer task on the current Tokio runtime.
    #[must_use]
    pub fn spawn(store: SnapshotStore) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Save(snapshot) => store.save(&snapshot).await,
                    WriteCommand::Clear => store.clear().await,
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { tx }
    }

    pub fn save(&self, snapshot: ProgressSnapshot) {
        self.send(WriteCommand::Save(Box::new(snapshot)));
    }

    pub fn clear(&self) {
        self.send(WriteCommand::Clear);
    }

    /// Wait until every command queued before this call has been applied.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WriterClosed` if the writer task is gone.
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Flush(done_tx))
            .map_err(|_| PersistenceError::WriterClosed)?;
        done_rx.await.map_err(|_| PersistenceError::WriterClosed)
    }

    fn send(&self, command: WriteCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!(error = %PersistenceError::WriterClosed, "dropping quiz progress write");
        }
    }
}
