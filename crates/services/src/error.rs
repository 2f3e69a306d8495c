//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use quiz_core::model::{BankError, ValidationError};
use storage::repository::StorageError;

/// Errors emitted while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("loading timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to load quiz data ({0})")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unable to read quiz data: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Malformed(#[from] BankError),
}

impl LoadError {
    /// Message shown to the candidate; every load failure is worth a retry.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::Timeout(_) => {
                "Loading timeout - please check your internet connection and try again"
            }
            _ => {
                "Failed to load quiz data. Please check your internet connection and try again."
            }
        }
    }
}

/// Errors emitted by the local-storage snapshot adapter.
///
/// Callers log and drop these; they never reach the candidate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot writer has shut down")]
    WriterClosed,
}

/// Errors emitted by session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("option {0} is out of range")]
    InvalidOption(u8),
    #[error("question is not part of the current subject")]
    UnknownQuestion,
    #[error("quiz is not finished yet")]
    NotFinished,
}

/// Errors emitted when a quiz cannot start.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Errors emitted while preparing the results share link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShareError {
    #[error("quiz is not finished yet")]
    NotFinished,
    #[error("share recipient must contain digits only: {0}")]
    InvalidRecipient(String),
    #[error("share link could not be built: {0}")]
    Link(String),
    #[error("share link could not be opened: {0}")]
    Open(String),
}
