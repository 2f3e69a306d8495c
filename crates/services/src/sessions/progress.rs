use chrono::Duration;

use quiz_core::model::{Candidate, Subject};

/// Position within the current subject, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionProgress {
    /// 1-based number of the question on screen.
    pub number: usize,
    pub total: usize,
}

impl QuestionProgress {
    /// Completion in percent, counting the question on screen.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.number.min(self.total) * 100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.number <= 1
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.number >= self.total
    }
}

/// Outcome of one submitted subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectResult {
    pub subject: Subject,
    pub score: u8,
    pub out_of: usize,
    pub elapsed: Duration,
    pub auto_submitted: bool,
}

/// Outcome of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResults {
    pub candidate: Candidate,
    pub subjects: Vec<SubjectResult>,
}

impl FinalResults {
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.subjects.iter().map(|r| u32::from(r.score)).sum()
    }

    #[must_use]
    pub fn max_score(&self) -> usize {
        self.subjects.iter().map(|r| r.out_of).sum()
    }

    #[must_use]
    pub fn total_time(&self) -> Duration {
        self.subjects
            .iter()
            .fold(Duration::zero(), |acc, r| acc + r.elapsed)
    }

    #[must_use]
    pub fn result(&self, subject: Subject) -> Option<&SubjectResult> {
        self.subjects.iter().find(|r| r.subject == subject)
    }
}
