//! Error types for quizdeck-core.
//!
//! Store errors live here rather than in `quizdeck-store` so every backend
//! shares one type and the fallback store can tell an unreachable backend
//! from one that refused.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Variant;

/// Errors that make a question source unusable.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The question file could not be read.
    #[error("failed to read question file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV header row could not be decoded.
    #[error("failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required header columns are absent.
    #[error("Missing required CSV headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    /// Every data row was malformed or the file had none.
    #[error("No valid questions found in CSV file")]
    NoQuestions,
}

/// Errors produced while classifying a single raw row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// `QuestionText` is missing or blank.
    #[error("question text is empty")]
    EmptyQuestionText,
}

/// Errors from misuse of a quiz session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No question set has been loaded yet.
    #[error("no questions loaded")]
    NotLoaded,

    /// The session has been submitted; input is disabled until the next start.
    #[error("quiz is not active")]
    NotActive,

    /// The question index is outside the displayed set.
    #[error("question index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The response shape does not fit the question.
    #[error("a {got} response cannot answer a {expected} question")]
    ResponseMismatch { expected: Variant, got: &'static str },
}

/// Errors that can occur when talking to a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected our credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend returned an error response.
    #[error("store error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The request timed out.
    #[error("store request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// Stored data could not be decoded.
    #[error("malformed stored data: {0}")]
    Malformed(String),

    /// The backend is misconfigured (e.g. an unusable base URL).
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// A local file operation failed.
    #[error("local store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if the backend itself is unreachable, as opposed to
    /// returning a definite answer.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Timeout(_) | StoreError::Network(_))
    }
}
