//! Error types for drafts, submissions and the document store.

use std::path::PathBuf;

use thiserror::Error;

/// A draft transition that cannot be applied to the current repeat shape.
///
/// The draft is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Repeat is not enabled for this task")]
    RepeatDisabled,

    #[error("Custom repeats use a date range, not an interval")]
    IntervalOnCustomRange,

    #[error("Only custom repeats take a date range")]
    RangeOnIntervalRepeat,

    #[error("Repeat interval must be at least 1")]
    InvalidInterval,

    #[error("Repeat range ends ({to}) before it starts ({from})")]
    InvalidRange { from: String, to: String },
}

/// Failures while handing a task draft to the store.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No account found")]
    MissingAccount,

    #[error("Failed to save task: {0}")]
    StoreWriteFailure(#[from] StoreError),
}

/// Validation failures of the theme creation form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeFormError {
    #[error("Please enter theme name")]
    EmptyName,

    #[error("No account found")]
    MissingAccount,
}

/// Document store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store file '{path}' is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Invalid collection path '{path}'")]
    InvalidPath { path: String },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
