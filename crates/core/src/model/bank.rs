use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::model::question::{Question, QuestionError, QuestionId};
use crate::model::subject::Subject;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Shape problems found while reading a question document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question data is not valid JSON: {0}")]
    Json(String),

    #[error("invalid quiz data structure: missing {0} questions")]
    MissingSubject(Subject),

    #[error("invalid question count for {subject}: expected {expected}, found {found}")]
    WrongQuestionCount {
        subject: Subject,
        expected: usize,
        found: usize,
    },

    #[error("invalid question structure in {subject} section: question {position} is missing `{field}`")]
    MissingField {
        subject: Subject,
        position: usize,
        field: &'static str,
    },

    #[error("invalid question in {subject} section: {source}")]
    InvalidQuestion {
        subject: Subject,
        #[source]
        source: QuestionError,
    },

    #[error("duplicate question id {id} in {subject} section")]
    DuplicateId { subject: Subject, id: QuestionId },
}

//
// ─── WIRE FORMAT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: Option<QuestionId>,
    question: Option<String>,
    options: Option<Vec<String>>,
    #[serde(rename = "answerIndex")]
    answer_index: Option<i64>,
}

impl RawQuestion {
    fn into_question(self, subject: Subject, position: usize) -> Result<Question, BankError> {
        let missing = |field| BankError::MissingField {
            subject,
            position,
            field,
        };
        let id = self.id.ok_or_else(|| missing("id"))?;
        let prompt = self.question.ok_or_else(|| missing("question"))?;
        let options = self.options.ok_or_else(|| missing("options"))?;
        let answer_index = self.answer_index.ok_or_else(|| missing("answerIndex"))?;

        Question::new(id, prompt, options, answer_index)
            .map_err(|source| BankError::InvalidQuestion { subject, source })
    }
}

//
// ─── BANK ─────────────────────────────────────────────────────────────────────
//

/// Validated pool of questions for every subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: [Vec<Question>; 3],
}

impl QuestionBank {
    /// Parse and validate a question document.
    ///
    /// The document maps subject keys (`HTML`, `CSS`, `JS`) to arrays of
    /// `{id, question, options, answerIndex}`. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the JSON is malformed, a subject is missing, a
    /// subject does not hold exactly `per_subject` questions, or any question is
    /// incomplete, malformed, or reuses an id. Ids are compared by their text,
    /// so the number `7` and the string `"7"` count as the same id.
    pub fn from_json(document: &str, per_subject: usize) -> Result<Self, BankError> {
        let mut raw: HashMap<String, Vec<RawQuestion>> =
            serde_json::from_str(document).map_err(|err| BankError::Json(err.to_string()))?;

        // Presence and counts are checked for every subject before any question.
        let mut sections = Vec::with_capacity(Subject::ALL.len());
        for subject in Subject::ALL {
            let section = raw
                .remove(subject.key())
                .ok_or(BankError::MissingSubject(subject))?;
            if section.len() != per_subject {
                return Err(BankError::WrongQuestionCount {
                    subject,
                    expected: per_subject,
                    found: section.len(),
                });
            }
            sections.push((subject, section));
        }

        let mut questions: [Vec<Question>; 3] = Default::default();
        for (subject, section) in sections {
            let mut seen = HashSet::with_capacity(section.len());
            let mut parsed = Vec::with_capacity(section.len());
            for (position, raw_question) in section.into_iter().enumerate() {
                let question = raw_question.into_question(subject, position)?;
                // Saved answers are keyed by the id's text, so `1` and `"1"` collide.
                if !seen.insert(question.id().to_string()) {
                    return Err(BankError::DuplicateId {
                        subject,
                        id: question.id().clone(),
                    });
                }
                parsed.push(question);
            }
            questions[subject.index()] = parsed;
        }

        Ok(Self { questions })
    }

    /// All questions for a subject, in document order.
    #[must_use]
    pub fn questions(&self, subject: Subject) -> &[Question] {
        &self.questions[subject.index()]
    }

    /// Total number of questions across subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
