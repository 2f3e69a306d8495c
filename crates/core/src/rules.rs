use chrono::Duration;

/// Fixed parameters of a quiz run.
///
/// Defaults reproduce the exam format: 10 of 40 questions per subject,
/// five minutes per subject, snapshots valid for a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRules {
    questions_per_subject: usize,
    bank_questions_per_subject: usize,
    subject_time_budget: Duration,
    snapshot_ttl: Duration,
    fetch_timeout: std::time::Duration,
    tick_period: std::time::Duration,
    warning_threshold: Duration,
    danger_threshold: Duration,
}

impl Default for QuizRules {
    fn default() -> Self {
        Self {
            questions_per_subject: 10,
            bank_questions_per_subject: 40,
            subject_time_budget: Duration::minutes(5),
            snapshot_ttl: Duration::hours(24),
            fetch_timeout: std::time::Duration::from_secs(5),
            tick_period: std::time::Duration::from_secs(1),
            warning_threshold: Duration::minutes(2),
            danger_threshold: Duration::minutes(1),
        }
    }
}

impl QuizRules {
    #[must_use]
    pub fn with_subject_time_budget(mut self, budget: Duration) -> Self {
        self.subject_time_budget = budget;
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: std::time::Duration) -> Self {
        self.tick_period = period;
        self
    }

    #[must_use]
    pub fn questions_per_subject(&self) -> usize {
        self.questions_per_subject
    }

    #[must_use]
    pub fn bank_questions_per_subject(&self) -> usize {
        self.bank_questions_per_subject
    }

    #[must_use]
    pub fn subject_time_budget(&self) -> Duration {
        self.subject_time_budget
    }

    #[must_use]
    pub fn snapshot_ttl(&self) -> Duration {
        self.snapshot_ttl
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> std::time::Duration {
        self.fetch_timeout
    }

    #[must_use]
    pub fn tick_period(&self) -> std::time::Duration {
        self.tick_period
    }

    /// Remaining time at or below which the countdown is shown as a warning.
    #[must_use]
    pub fn warning_threshold(&self) -> Duration {
        self.warning_threshold
    }

    /// Remaining time at or below which the countdown is shown as urgent.
    #[must_use]
    pub fn danger_threshold(&self) -> Duration {
        self.danger_threshold
    }

    /// Highest score reachable across all subjects.
    #[must_use]
    pub fn max_total_score(&self) -> usize {
        self.questions_per_subject * crate::model::Subject::ALL.len()
    }
}
