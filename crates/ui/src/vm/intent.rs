use dioxus::prelude::Key;
use services::{QuizDriver, QuizPhase};

/// Screen shown for the current driver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Landing,
    Quiz,
    SubjectResults,
    FinalResults,
}

impl Section {
    #[must_use]
    pub fn for_driver(driver: Option<&QuizDriver>) -> Self {
        match driver.map(|d| d.session().phase()) {
            None | Some(QuizPhase::NotStarted) => Self::Landing,
            Some(QuizPhase::SubjectInProgress) => Self::Quiz,
            Some(QuizPhase::SubjectResults) => Self::SubjectResults,
            Some(QuizPhase::FinalResults) => Self::FinalResults,
        }
    }

    /// Whether closing the window now would discard a run in progress.
    #[must_use]
    pub fn guards_close(self) -> bool {
        matches!(self, Self::Quiz | Self::SubjectResults)
    }
}

/// Quiz gestures that map directly onto driver operations.
///
/// Form submission and sharing need I/O and are handled by the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SelectOption(u8),
    Prev,
    Next,
    SubmitSubject,
    Continue,
    Restart,
}

pub fn apply_intent(driver: &mut QuizDriver, intent: QuizIntent) {
    match intent {
        QuizIntent::SelectOption(index) => {
            if let Err(err) = driver.select_option(index) {
                tracing::debug!(error = %err, "option rejected");
            }
        }
        QuizIntent::Prev => driver.prev(),
        QuizIntent::Next => driver.next(),
        QuizIntent::SubmitSubject => driver.submit_subject(),
        QuizIntent::Continue => driver.continue_to_next(),
        QuizIntent::Restart => driver.restart(),
    }
}

/// Arrow-key navigation inside a subject.
///
/// `ArrowRight` never finishes the subject from the last question.
#[must_use]
pub fn arrow_intent(key: &Key, is_first: bool, is_last: bool) -> Option<QuizIntent> {
    match key {
        Key::ArrowLeft if !is_first => Some(QuizIntent::Prev),
        Key::ArrowRight if !is_last => Some(QuizIntent::Next),
        _ => None,
    }
}
