//! Request bodies accepted by the task API.
//!
//! The same types are serialised by [`crate::client`], so the client and the
//! server cannot drift apart on field names.

use crate::task::services::{CreateTaskRequest, UpdateTaskRequest};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    /// Task title; missing is treated like blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Task description; missing is treated like blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional due date in RFC 3339 or `YYYY-MM-DD` form; blank is treated
    /// like missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl From<CreateTaskBody> for CreateTaskRequest {
    fn from(body: CreateTaskBody) -> Self {
        let mut request = Self::new(
            body.title.unwrap_or_default(),
            body.description.unwrap_or_default(),
        );
        if let Some(due_date) = body.due_date.filter(|raw| !raw.trim().is_empty()) {
            request = request.with_due_date(due_date);
        }
        request
    }
}

/// Body of `PUT /api/tasks/{id}`.
///
/// Absent fields keep their stored value. `dueDate: null` clears the due
/// date, which is why that field is doubly optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement due date; `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<String>>,
    /// Replacement completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Version the caller last observed, for conditional updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl From<UpdateTaskBody> for UpdateTaskRequest {
    fn from(body: UpdateTaskBody) -> Self {
        let mut request = Self::new();
        if let Some(title) = body.title {
            request = request.with_title(title);
        }
        if let Some(description) = body.description {
            request = request.with_description(description);
        }
        match body.due_date {
            Some(Some(due_date)) => request = request.with_due_date(due_date),
            Some(None) => request = request.clear_due_date(),
            None => {}
        }
        if let Some(completed) = body.completed {
            request = request.with_completed(completed);
        }
        if let Some(version) = body.version {
            request = request.with_expected_version(version);
        }
        request
    }
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
