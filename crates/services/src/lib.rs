#![forbid(unsafe_code)]

pub mod bank_loader;
pub mod error;
pub mod persistence;
pub mod selector;
pub mod sessions;
pub mod share;
pub mod timer;

pub use quiz_core::Clock;
pub use sessions as session;

pub use bank_loader::{BankSource, QuestionBankLoader};
pub use error::{LoadError, PersistenceError, SessionError, ShareError, StartError};
pub use persistence::{PROGRESS_KEY, SnapshotStore, SnapshotWriter};
pub use selector::QuestionSelector;
pub use sessions::{
    FinalResults, NavDirection, QuestionProgress, QuizDriver, QuizLoopService, QuizPhase,
    QuizSession, SessionEffect, SubjectResult,
};
pub use share::{ShareTarget, summary_message};
pub use timer::{SubjectTimer, TickHandle, TickOutcome, TimerTick};
