//! Mapping of failures onto HTTP status codes and the failure envelope.

use super::envelope::Envelope;
use crate::task::services::TaskServiceError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors produced by API handlers.
///
/// Every variant renders as `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong bearer token.
    #[error("authentication required")]
    Unauthenticated,

    /// No resource for the requested identifier or route.
    #[error("{0}")]
    NotFound(String),

    /// The route exists but does not accept the request method.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// The request was refused before reaching a handler, for example an
    /// oversized body or a missing JSON content type.
    #[error("{message}")]
    Rejected {
        /// Status reported by the extractor.
        status: StatusCode,
        /// Extractor explanation.
        message: String,
    },

    /// A conditional update observed a newer version.
    #[error("{0}")]
    Conflict(String),

    /// The store failed; the detail has been logged.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Rejected { status, .. } => *status,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translates a service error raised while performing `operation`.
    ///
    /// Store failures are logged here with their full detail and replaced by
    /// a generic message naming the operation.
    pub fn from_service(operation: &'static str, err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Validation(domain) => Self::Validation(domain.to_string()),
            not_found @ TaskServiceError::NotFound(_) => Self::NotFound(not_found.to_string()),
            conflict @ TaskServiceError::Conflict { .. } => Self::Conflict(conflict.to_string()),
            TaskServiceError::Repository(source) => {
                error!(operation, error = %source, "task store failure");
                Self::Internal(format!("failed to {operation}"))
            }
        }
    }
}

/// Syntax and data errors in the body are validation failures (400); other
/// extractor statuses such as 413 and 415 are kept.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = format!("invalid request body: {}", rejection.body_text());
        match rejection.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(message),
            status => Self::Rejected { status, message },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(format!("invalid task id: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(Envelope::<()>::failure(self.to_string()))).into_response()
    }
}
