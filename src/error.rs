//! Error types for the task store.

use std::io;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the task store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Task name is empty or whitespace.
    #[error("Task name must not be empty")]
    EmptyName,

    /// Task not found.
    #[error("Task #{0} not found")]
    TaskNotFound(i64),

    /// Due date string could not be parsed.
    #[error("Invalid due date: {0} (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDue(String),
}
