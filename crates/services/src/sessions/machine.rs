use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Duration;

use quiz_core::{Moment, QuizRules};
use quiz_core::model::{
    Candidate, CandidateDraft, OPTION_COUNT, ProgressSnapshot, Question, QuestionBank, QuestionId,
    SnapshotCandidate, Subject, ValidationError,
};

use super::progress::{FinalResults, QuestionProgress, SubjectResult};
use crate::error::SessionError;
use crate::selector::QuestionSelector;
use crate::timer::{SubjectTimer, TickOutcome};

//
// ─── PHASES & EFFECTS ──────────────────────────────────────────────────────────
//

/// Where the candidate is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    SubjectInProgress,
    SubjectResults,
    FinalResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

/// Work the driver must carry out after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    Persist(ProgressSnapshot),
    ClearPersisted,
    StartTimer { generation: u64 },
    StopTimer,
}

//
// ─── SUBJECT RECORD ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default)]
struct SubjectRecord {
    selected: Vec<Question>,
    answers: HashMap<QuestionId, u8>,
    score: Option<u8>,
    elapsed: Option<Duration>,
    auto_submitted: bool,
}

impl SubjectRecord {
    fn count_correct(&self) -> u8 {
        let correct = self
            .selected
            .iter()
            .filter(|q| q.is_correct(self.answers.get(q.id()).copied()))
            .count();
        u8::try_from(correct).unwrap_or(u8::MAX)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for a single quiz run.
///
/// Operations never perform I/O. Each takes the current time from the caller
/// and returns the `SessionEffect`s the driver must apply, in order.
pub struct QuizSession {
    rules: QuizRules,
    selector: QuestionSelector,
    bank: Option<Arc<QuestionBank>>,
    candidate: Option<Candidate>,
    phase: QuizPhase,
    subject: Subject,
    question_index: usize,
    records: [SubjectRecord; 3],
    timer: SubjectTimer,
    generation: u64,
}

impl QuizSession {
    #[must_use]
    pub fn new(rules: QuizRules, selector: QuestionSelector) -> Self {
        Self {
            rules,
            selector,
            bank: None,
            candidate: None,
            phase: QuizPhase::NotStarted,
            subject: Subject::Html,
            question_index: 0,
            records: Default::default(),
            timer: SubjectTimer::new(),
            generation: 0,
        }
    }

    /// Validate the candidate and enter the first subject.
    ///
    /// Starting over an active run discards it first.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every invalid field; the session is
    /// left untouched.
    pub fn start(
        &mut self,
        draft: CandidateDraft,
        bank: Arc<QuestionBank>,
        now: Moment,
    ) -> Result<Vec<SessionEffect>, ValidationError> {
        let candidate = draft.validate()?;

        let mut effects = Vec::new();
        if self.timer.is_running() {
            effects.push(SessionEffect::StopTimer);
        }
        self.records = Default::default();
        self.bank = Some(bank);
        self.candidate = Some(candidate);

        effects.extend(self.enter_subject(Subject::Html, now));
        effects.extend(self.persist(now));
        tracing::info!(generation = self.generation, "quiz started");
        Ok(effects)
    }

    /// Record `option` for the question `id` of the current subject.
    ///
    /// Does nothing unless a subject is in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` for an option outside `0..4` and
    /// `SessionError::UnknownQuestion` for an id not selected for this subject.
    pub fn select_answer(
        &mut self,
        id: &QuestionId,
        option: u8,
        now: Moment,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if self.phase != QuizPhase::SubjectInProgress {
            return Ok(Vec::new());
        }
        if usize::from(option) >= OPTION_COUNT {
            return Err(SessionError::InvalidOption(option));
        }
        let record = &mut self.records[self.subject.index()];
        if !record.selected.iter().any(|q| q.id() == id) {
            return Err(SessionError::UnknownQuestion);
        }
        record.answers.insert(id.clone(), option);
        Ok(self.persist(now).into_iter().collect())
    }

    /// Record `option` for the question on screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` for an option outside `0..4`.
    pub fn select_current(
        &mut self,
        option: u8,
        now: Moment,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let Some(id) = self.current_question().map(|q| q.id().clone()) else {
            return Ok(Vec::new());
        };
        self.select_answer(&id, option, now)
    }

    /// Move between questions. `Next` on the last question submits the subject.
    pub fn navigate(&mut self, direction: NavDirection, now: Moment) -> Vec<SessionEffect> {
        if self.phase != QuizPhase::SubjectInProgress {
            return Vec::new();
        }
        match direction {
            NavDirection::Prev => {
                if self.question_index == 0 {
                    return Vec::new();
                }
                self.question_index -= 1;
            }
            NavDirection::Next => {
                if self.question_index + 1 >= self.current_record().selected.len() {
                    return self.submit_subject(false, now);
                }
                self.question_index += 1;
            }
        }
        self.persist(now).into_iter().collect()
    }

    /// Stop the timer, record time and score, and show the subject results.
    ///
    /// Only the first call for a subject has any effect, so a manual submit
    /// racing a timer expiry is safe.
    pub fn submit_subject(&mut self, auto: bool, now: Moment) -> Vec<SessionEffect> {
        if self.phase != QuizPhase::SubjectInProgress {
            tracing::debug!(subject = %self.subject, auto, "ignoring submit outside a running subject");
            return Vec::new();
        }

        let elapsed = self.timer.stop(now);
        self.generation += 1;
        let subject = self.subject;
        let record = &mut self.records[subject.index()];
        let score = record.count_correct();
        record.score = Some(score);
        record.elapsed = Some(elapsed);
        record.auto_submitted = auto;
        self.phase = QuizPhase::SubjectResults;

        tracing::info!(
            subject = %subject,
            score,
            elapsed_ms = elapsed.num_milliseconds(),
            auto,
            "subject submitted"
        );

        let mut effects = vec![SessionEffect::StopTimer];
        effects.extend(self.persist(now));
        effects
    }

    /// Apply a scheduler tick; expiry auto-submits the subject.
    ///
    /// Ticks from an older timer generation, or arriving outside a running
    /// subject, are ignored.
    pub fn tick(&mut self, generation: u64, now: Moment) -> Vec<SessionEffect> {
        if generation != self.generation || self.phase != QuizPhase::SubjectInProgress {
            tracing::debug!(
                generation,
                current = self.generation,
                phase = ?self.phase,
                "ignoring stale tick"
            );
            return Vec::new();
        }
        match self.timer.tick(now) {
            TickOutcome::Expired => {
                tracing::info!(subject = %self.subject, "subject time expired");
                self.submit_subject(true, now)
            }
            TickOutcome::Running { .. } | TickOutcome::Inactive => Vec::new(),
        }
    }

    /// Leave the subject results screen.
    pub fn continue_to_next(&mut self, now: Moment) -> Vec<SessionEffect> {
        if self.phase != QuizPhase::SubjectResults {
            return Vec::new();
        }
        match self.subject.next() {
            Some(next) => {
                let mut effects = self.enter_subject(next, now);
                effects.extend(self.persist(now));
                effects
            }
            None => {
                self.phase = QuizPhase::FinalResults;
                if let Some(results) = self.final_results() {
                    tracing::info!(
                        total_score = results.total_score(),
                        total_ms = results.total_time().num_milliseconds(),
                        "quiz completed"
                    );
                }
                vec![SessionEffect::ClearPersisted]
            }
        }
    }

    /// Drop all progress and return to the landing state.
    pub fn restart(&mut self) -> Vec<SessionEffect> {
        self.timer = SubjectTimer::new();
        self.generation += 1;
        self.records = Default::default();
        self.candidate = None;
        self.phase = QuizPhase::NotStarted;
        self.subject = Subject::Html;
        self.question_index = 0;
        tracing::info!("quiz restarted");
        vec![SessionEffect::StopTimer, SessionEffect::ClearPersisted]
    }

    fn enter_subject(&mut self, subject: Subject, now: Moment) -> Vec<SessionEffect> {
        self.subject = subject;
        self.question_index = 0;

        let record = &mut self.records[subject.index()];
        if record.selected.is_empty() {
            if let Some(bank) = &self.bank {
                record.selected =
                    self.selector
                        .select(bank, subject, self.rules.questions_per_subject());
            }
        }

        self.generation += 1;
        self.timer.start(now, self.rules.subject_time_budget());
        self.phase = QuizPhase::SubjectInProgress;
        tracing::debug!(subject = %subject, generation = self.generation, "subject entered");
        vec![SessionEffect::StartTimer {
            generation: self.generation,
        }]
    }

    fn persist(&self, now: Moment) -> Option<SessionEffect> {
        self.snapshot(now).map(SessionEffect::Persist)
    }

    fn current_record(&self) -> &SubjectRecord {
        &self.records[self.subject.index()]
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn rules(&self) -> &QuizRules {
        &self.rules
    }

    #[must_use]
    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    #[must_use]
    pub fn current_subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Generation of the most recently started timer.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Questions chosen for `subject`; empty until the subject is entered.
    #[must_use]
    pub fn selected_questions(&self, subject: Subject) -> &[Question] {
        &self.records[subject.index()].selected
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_record().selected.get(self.question_index)
    }

    #[must_use]
    pub fn answer_for(&self, subject: Subject, id: &QuestionId) -> Option<u8> {
        self.records[subject.index()].answers.get(id).copied()
    }

    /// Option chosen for the question on screen.
    #[must_use]
    pub fn selected_option(&self) -> Option<u8> {
        let question = self.current_question()?;
        self.answer_for(self.subject, question.id())
    }

    #[must_use]
    pub fn progress(&self) -> QuestionProgress {
        QuestionProgress {
            number: self.question_index + 1,
            total: self.current_record().selected.len(),
        }
    }

    /// Time left on the subject timer at `now`.
    #[must_use]
    pub fn remaining(&self, now: Moment) -> Duration {
        self.timer.remaining(now)
    }

    /// Result of `subject`, once it has been submitted.
    #[must_use]
    pub fn subject_result(&self, subject: Subject) -> Option<SubjectResult> {
        let record = &self.records[subject.index()];
        Some(SubjectResult {
            subject,
            score: record.score?,
            out_of: record.selected.len(),
            elapsed: record.elapsed?,
            auto_submitted: record.auto_submitted,
        })
    }

    /// Result of the subject just submitted, while its results are shown.
    #[must_use]
    pub fn current_result(&self) -> Option<SubjectResult> {
        if self.phase != QuizPhase::SubjectResults {
            return None;
        }
        self.subject_result(self.subject)
    }

    /// Results of a finished quiz.
    #[must_use]
    pub fn final_results(&self) -> Option<FinalResults> {
        if self.phase != QuizPhase::FinalResults {
            return None;
        }
        let candidate = self.candidate.clone()?;
        let subjects = Subject::ALL
            .into_iter()
            .map(|subject| self.subject_result(subject))
            .collect::<Option<Vec<_>>>()?;
        Some(FinalResults {
            candidate,
            subjects,
        })
    }

    /// Serializable view of the run, or `None` before a candidate is known.
    #[must_use]
    pub fn snapshot(&self, now: Moment) -> Option<ProgressSnapshot> {
        let candidate = self.candidate.as_ref()?;
        let mut answers = BTreeMap::new();
        let mut scores = BTreeMap::new();
        let mut times = BTreeMap::new();
        for subject in Subject::ALL {
            let record = &self.records[subject.index()];
            answers.insert(
                subject,
                record
                    .answers
                    .iter()
                    .map(|(id, option)| (id.to_string(), *option))
                    .collect(),
            );
            scores.insert(subject, record.score.unwrap_or(0));
            let millis = record.elapsed.map_or(0, |d| d.num_milliseconds());
            times.insert(subject, u64::try_from(millis).unwrap_or(0));
        }
        Some(ProgressSnapshot {
            candidate: SnapshotCandidate::from(candidate),
            current_subject_index: self.subject.index(),
            current_question_index: self.question_index,
            answers,
            scores,
            times,
            saved_at: now.wall(),
        })
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("subject", &self.subject)
            .field("question_index", &self.question_index)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
