use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id} has no prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} must have exactly 4 options, found {found}")]
    OptionCount { id: QuestionId, found: usize },

    #[error("question {id} has invalid answerIndex {index}")]
    AnswerIndexOutOfRange { id: QuestionId, index: i64 },
}

//
// ─── IDENTIFIER ───────────────────────────────────────────────────────────────
//

/// Identifier of a question as it appears in the question document.
///
/// Documents use either numbers or strings; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl QuestionId {
    /// Falsy ids (`0`, `""`) are treated as missing by the question document.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            QuestionId::Number(n) => *n == 0,
            QuestionId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{n}"),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_option: u8,
}

impl Question {
    /// Build a question, checking the option count and answer index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or prompt is blank, there are not exactly
    /// four options, or `correct_option` is outside `0..4`.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: i64,
    ) -> Result<Self, QuestionError> {
        if id.is_blank() {
            return Err(QuestionError::EmptyId);
        }
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        let found = options.len();
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::OptionCount { id: id.clone(), found })?;
        let correct_option = u8::try_from(correct_option)
            .ok()
            .filter(|index| usize::from(*index) < OPTION_COUNT)
            .ok_or(QuestionError::AnswerIndexOutOfRange {
                id: id.clone(),
                index: correct_option,
            })?;

        Ok(Self {
            id,
            prompt,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> u8 {
        self.correct_option
    }

    /// Whether `choice` is the correct option. Unanswered never counts.
    #[must_use]
    pub fn is_correct(&self, choice: Option<u8>) -> bool {
        choice == Some(self.correct_option)
    }
}
