use std::sync::Arc;

use chrono::Duration;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use quiz_core::{Clock, Moment};
use quiz_core::model::{CandidateDraft, QuestionBank, ValidationError};

use super::machine::{NavDirection, QuizSession, SessionEffect};
use crate::error::{SessionError, ShareError};
use crate::persistence::SnapshotWriter;
use crate::share::{ShareTarget, summary_message};
use crate::timer::{TickHandle, TimerTick};

/// Owns a `QuizSession` and carries out the effects it returns.
///
/// Every intent reads the time from the driver's clock, applies the matching
/// session operation and then its effects: snapshot writes go to the ordered
/// writer, timer effects start or stop the tick task.
pub struct QuizDriver {
    session: QuizSession,
    clock: Clock,
    writer: SnapshotWriter,
    ticks: UnboundedSender<TimerTick>,
    tick_period: std::time::Duration,
    ticker: Option<TickHandle>,
}

impl QuizDriver {
    #[must_use]
    pub fn new(
        session: QuizSession,
        clock: Clock,
        writer: SnapshotWriter,
        ticks: UnboundedSender<TimerTick>,
    ) -> Self {
        let tick_period = session.rules().tick_period();
        Self {
            session,
            clock,
            writer,
            ticks,
            tick_period,
            ticker: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Mutable clock access, used to move fixed clocks forward in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn now(&self) -> Moment {
        self.clock.moment()
    }

    /// Whether a tick task is currently scheduled.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Time left on the running subject.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.session.remaining(self.now())
    }

    /// # Errors
    ///
    /// Returns `ValidationError` if the candidate details are invalid.
    pub fn start(
        &mut self,
        draft: CandidateDraft,
        bank: Arc<QuestionBank>,
    ) -> Result<(), ValidationError> {
        let now = self.now();
        let effects = self.session.start(draft, bank, now)?;
        self.apply(effects);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` for an option outside `0..4`.
    pub fn select_option(&mut self, option: u8) -> Result<(), SessionError> {
        let now = self.now();
        let effects = self.session.select_current(option, now)?;
        self.apply(effects);
        Ok(())
    }

    pub fn prev(&mut self) {
        let now = self.now();
        let effects = self.session.navigate(NavDirection::Prev, now);
        self.apply(effects);
    }

    pub fn next(&mut self) {
        let now = self.now();
        let effects = self.session.navigate(NavDirection::Next, now);
        self.apply(effects);
    }

    pub fn submit_subject(&mut self) {
        let now = self.now();
        let effects = self.session.submit_subject(false, now);
        self.apply(effects);
    }

    pub fn continue_to_next(&mut self) {
        let now = self.now();
        let effects = self.session.continue_to_next(now);
        self.apply(effects);
    }

    pub fn restart(&mut self) {
        let effects = self.session.restart();
        self.apply(effects);
    }

    pub fn on_tick(&mut self, tick: TimerTick) {
        let now = self.now();
        let effects = self.session.tick(tick.generation, now);
        self.apply(effects);
    }

    /// Plain-text summary of a finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::NotFinished` before the final results.
    pub fn share_message(&self) -> Result<String, ShareError> {
        let results = self.session.final_results().ok_or(ShareError::NotFinished)?;
        Ok(summary_message(&results))
    }

    /// Messaging deep link carrying the results summary.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::NotFinished` before the final results, or
    /// `ShareError::Link` if the link cannot be built.
    pub fn share_link(&self, target: &ShareTarget) -> Result<Url, ShareError> {
        let message = self.share_message()?;
        target.deep_link(&message)
    }

    fn apply(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::Persist(snapshot) => self.writer.save(snapshot),
                SessionEffect::ClearPersisted => self.writer.clear(),
                SessionEffect::StartTimer { generation } => {
                    if let Some(previous) = self.ticker.take() {
                        previous.stop();
                    }
                    self.ticker = Some(TickHandle::spawn(
                        generation,
                        self.tick_period,
                        self.ticks.clone(),
                    ));
                }
                SessionEffect::StopTimer => {
                    if let Some(ticker) = self.ticker.take() {
                        ticker.stop();
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for QuizDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizDriver")
            .field("session", &self.session)
            .field("clock", &self.clock)
            .field("ticking", &self.ticker.is_some())
            .finish_non_exhaustive()
    }
}
