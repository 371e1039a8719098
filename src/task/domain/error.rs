//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task id '{0}', expected a positive integer")]
    InvalidTaskId(String),

    /// The task title is missing or empty after trimming.
    #[error("task title is required and must be a non-empty string")]
    EmptyTitle,

    /// The task description is missing or empty after trimming.
    #[error("task description is required and must be a non-empty string")]
    EmptyDescription,

    /// The due date could not be parsed as a calendar date or date-time.
    #[error("invalid due date '{0}', expected an RFC 3339 date-time or YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The concurrency version is not a positive integer.
    #[error("invalid task version {0}, expected a positive integer")]
    InvalidVersion(i64),

    /// An update request carried no field to change.
    #[error("update must change at least one of title, description, dueDate or completed")]
    EmptyUpdate,
}
