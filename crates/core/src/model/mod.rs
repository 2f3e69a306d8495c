mod bank;
mod candidate;
mod question;
mod snapshot;
mod subject;

pub use bank::{BankError, QuestionBank};
pub use candidate::{
    Candidate, CandidateDraft, CandidateField, FieldError, FieldErrorKind, ValidationError,
    validate_contact_number, validate_email, validate_name,
};
pub use question::{OPTION_COUNT, Question, QuestionError, QuestionId};
pub use snapshot::{ProgressSnapshot, SnapshotCandidate};
pub use subject::Subject;
