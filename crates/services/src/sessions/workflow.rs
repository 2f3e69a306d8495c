use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use quiz_core::model::{CandidateDraft, ProgressSnapshot};
use quiz_core::{Clock, QuizRules};
use storage::repository::Storage;

use super::driver::QuizDriver;
use super::machine::QuizSession;
use crate::bank_loader::QuestionBankLoader;
use crate::error::{LoadError, PersistenceError, StartError};
use crate::persistence::{SnapshotStore, SnapshotWriter};
use crate::selector::QuestionSelector;
use crate::timer::TimerTick;

/// Orchestrates bank loading, session start and progress persistence.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    rules: QuizRules,
    loader: Arc<QuestionBankLoader>,
    store: SnapshotStore,
    writer: SnapshotWriter,
    seed: Option<u64>,
}

impl QuizLoopService {
    /// Build the service and spawn its snapshot writer.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(
        clock: Clock,
        rules: QuizRules,
        loader: QuestionBankLoader,
        storage: &Storage,
    ) -> Self {
        let store = SnapshotStore::new(Arc::clone(&storage.local), rules.snapshot_ttl());
        let writer = SnapshotWriter::spawn(store.clone());
        Self {
            clock,
            rules,
            loader: Arc::new(loader),
            store,
            writer,
            seed: None,
        }
    }

    /// Draw questions from a seeded generator instead of OS entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &QuizRules {
        &self.rules
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loader.cached().is_some()
    }

    /// Warm the bank cache in the background of the landing page.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if loading fails; the next start retries.
    pub async fn preload(&self) -> Result<(), LoadError> {
        self.loader.load().await.map(|_| ()).inspect_err(|err| {
            tracing::warn!(error = %err, "quiz data preload failed");
        })
    }

    /// Validate the candidate, load the bank and start a quiz.
    ///
    /// The candidate is saved before loading so a failed load still keeps the
    /// form filled in. The returned receiver carries the driver's timer ticks;
    /// feed each one back through `QuizDriver::on_tick`.
    ///
    /// # Errors
    ///
    /// Returns `StartError::Validation` for invalid details (nothing is
    /// loaded or saved) and `StartError::Load` if the bank is unavailable.
    pub async fn start_session(
        &self,
        draft: CandidateDraft,
    ) -> Result<(QuizDriver, UnboundedReceiver<TimerTick>), StartError> {
        let candidate = draft.clone().validate()?;
        self.writer
            .save(ProgressSnapshot::identity_only(&candidate, self.clock.now()));

        let bank = self.loader.load().await?;

        let selector = match self.seed {
            Some(seed) => QuestionSelector::seeded(seed),
            None => QuestionSelector::from_os_entropy(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let session = QuizSession::new(self.rules.clone(), selector);
        let mut driver = QuizDriver::new(session, self.clock, self.writer.clone(), tx);
        driver.start(draft, bank)?;
        Ok((driver, rx))
    }

    /// Identity fields of a recent snapshot, for pre-filling the form.
    pub async fn restore_candidate(&self) -> Option<CandidateDraft> {
        self.store
            .load(self.clock.now())
            .await
            .map(|snapshot| snapshot.candidate_draft())
    }

    /// Wait for queued snapshot writes to land.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WriterClosed` if the writer task is gone.
    pub async fn flush_snapshots(&self) -> Result<(), PersistenceError> {
        self.writer.flush().await
    }
}
