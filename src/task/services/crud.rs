//! Service layer for task listing, lookup, creation, update and deletion.
//!
//! Every operation validates its input before the repository is touched, so
//! a rejected request never reaches the store.

use crate::task::{
    domain::{
        DueDate, NewTask, Task, TaskChanges, TaskDescription, TaskDomainError, TaskId, TaskTitle,
        TaskVersion,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    due_date: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: None,
        }
    }

    /// Sets the raw due date to parse.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Request payload for partially updating a task.
///
/// Fields left unset keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<Option<String>>,
    completed: Option<bool>,
    expected_version: Option<i64>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the due date with the parsed value of `due_date`.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(Some(due_date.into()));
        self
    }

    /// Removes the due date.
    #[must_use]
    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Sets the completion flag. `false` un-completes the task.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Makes the update conditional on the stored version.
    #[must_use]
    pub const fn with_expected_version(mut self, version: i64) -> Self {
        self.expected_version = Some(version);
        self
    }

    fn into_changes(self, clock: &impl Clock) -> Result<TaskChanges, TaskDomainError> {
        let changes = TaskChanges {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description.map(TaskDescription::new).transpose()?,
            due_date: self
                .due_date
                .map(|due_date| due_date.as_deref().map(DueDate::parse).transpose())
                .transpose()?,
            completed: self.completed,
            expected_version: self.expected_version.map(TaskVersion::new).transpose()?,
            updated_at: clock.utc(),
        };
        if changes.is_empty() {
            return Err(TaskDomainError::EmptyUpdate);
        }
        Ok(changes)
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// No task has the requested identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// A conditional update lost a race with another writer.
    #[error("task {id} was modified concurrently: expected version {expected}, found {actual}")]
    Conflict {
        /// Task that was being updated.
        id: TaskId,
        /// Version the caller expected.
        expected: TaskVersion,
        /// Version currently stored.
        actual: TaskVersion,
    },

    /// The store failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::VersionConflict {
                id,
                expected,
                actual,
            } => Self::Conflict {
                id,
                expected,
                actual,
            },
            other @ TaskRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task management service.
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns every task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the store fails.
    pub async fn list(&self) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.repository.list().await?;
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    /// Returns the task with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no such task exists or
    /// [`TaskServiceError::Repository`] when the store fails.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Validates and stores a new task.
    ///
    /// Title and description are trimmed; the task starts incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the title or description
    /// is blank or the due date does not parse, or
    /// [`TaskServiceError::Repository`] when the store fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let description = TaskDescription::new(request.description)?;
        let due_date = request
            .due_date
            .as_deref()
            .map(DueDate::parse)
            .transpose()?;

        let new_task = NewTask::new(title, description, due_date, &*self.clock);
        let task = self.repository.insert(&new_task).await?;
        info!(task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Applies a partial update to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when no field is supplied or a
    /// supplied field is invalid, [`TaskServiceError::NotFound`] when the task
    /// does not exist, [`TaskServiceError::Conflict`] when an expected version
    /// is stale, or [`TaskServiceError::Repository`] when the store fails.
    pub async fn update(&self, id: TaskId, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let changes = request.into_changes(&*self.clock)?;
        let task = self.repository.update(id, &changes).await?;
        info!(task_id = %id, version = %task.version(), "updated task");
        Ok(task)
    }

    /// Deletes a task and returns its final state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist or
    /// [`TaskServiceError::Repository`] when the store fails.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.repository.delete(id).await?;
        info!(task_id = %id, "deleted task");
        Ok(task)
    }
}
