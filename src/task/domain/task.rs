//! Task aggregate root and the parameter objects used to create and change it.

use super::{DueDate, TaskDescription, TaskId, TaskTitle, TaskVersion};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Serialises to the camelCase wire shape used by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    completed: bool,
    due_date: Option<DueDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: TaskVersion,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted due date, if any.
    pub due_date: Option<DueDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted concurrency version.
    pub version: TaskVersion,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
        }
    }

    /// Builds the first persisted state of a new task once the store has
    /// assigned its identifier.
    #[must_use]
    pub fn from_new(id: TaskId, new_task: NewTask) -> Self {
        Self {
            id,
            title: new_task.title,
            description: new_task.description,
            completed: false,
            due_date: new_task.due_date,
            created_at: new_task.created_at,
            updated_at: new_task.created_at,
            version: TaskVersion::INITIAL,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns whether the task has been completed.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the concurrency version.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Applies a partial update in place.
    ///
    /// Only fields present in `changes` are replaced. The modification
    /// timestamp is taken from `changes` and the version is incremented. The
    /// caller is responsible for checking `changes.expected_version`.
    pub fn apply(&mut self, changes: &TaskChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.updated_at = changes.updated_at;
        self.version = self.version.next();
    }
}

/// Validated data for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Title to store.
    pub title: TaskTitle,
    /// Description to store.
    pub description: TaskDescription,
    /// Optional due date.
    pub due_date: Option<DueDate>,
    /// Creation timestamp, also used as the first modification timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a new task draft stamped with the current clock time.
    #[must_use]
    pub fn new(
        title: TaskTitle,
        description: TaskDescription,
        due_date: Option<DueDate>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            title,
            description,
            due_date,
            created_at: clock.utc(),
        }
    }
}

/// Validated partial update for an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<TaskDescription>,
    /// Replacement due date; `Some(None)` clears it.
    pub due_date: Option<Option<DueDate>>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
    /// Version the caller last observed; `None` updates unconditionally.
    pub expected_version: Option<TaskVersion>,
    /// Modification timestamp to record.
    pub updated_at: DateTime<Utc>,
}

impl TaskChanges {
    /// Returns `true` when no task field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}
