//! Client-side task cache mirroring the server's task list.
//!
//! Consistency policy: every mutating call is followed by a full reload,
//! whether the mutation succeeded or not. The cache never patches its list
//! locally, so after any operation it shows exactly what the server returned
//! from the most recent successful `list`.

use super::api::{ClientError, ClientResult, TaskApi};
use crate::http::{CreateTaskBody, UpdateTaskBody};
use crate::task::domain::{Task, TaskId};
use tracing::{debug, warn};

/// Completed and outstanding task totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// Tasks marked completed.
    pub completed: usize,
    /// Tasks not yet completed.
    pub remaining: usize,
}

/// Owning store for the client's view of the task list.
#[derive(Debug)]
pub struct TaskCache<A: TaskApi> {
    api: A,
    tasks: Vec<Task>,
    error: Option<String>,
}

impl<A: TaskApi> TaskCache<A> {
    /// Creates an empty cache. Call [`Self::refresh`] to load it.
    pub const fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            error: None,
        }
    }

    /// Creates a cache and loads the server's current list into it.
    ///
    /// A failed load leaves the list empty and the failure in
    /// [`Self::error`].
    pub async fn load(api: A) -> Self {
        let mut cache = Self::new(api);
        if cache.refresh().await.is_err() {
            debug!("task cache starts empty");
        }
        cache
    }

    /// Returns the cached tasks, newest first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the cached task with `id`, if present.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns the message of the most recent failure, if the last operation
    /// failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns completed and outstanding totals for the cached list.
    #[must_use]
    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|task| task.completed()).count();
        TaskCounts {
            completed,
            remaining: self.tasks.len() - completed,
        }
    }

    /// Replaces the cached list with the server's current list.
    ///
    /// On failure the previous list is kept and the error is recorded.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] raised by the API.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let outcome = self.reload().await;
        self.record(outcome)
    }

    /// Creates a task, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the creation error if creation failed, otherwise the reload
    /// error if reloading failed.
    pub async fn add(&mut self, body: CreateTaskBody) -> ClientResult<()> {
        let mutation = self.api.create(&body).await.map(drop);
        self.reload_after(mutation).await
    }

    /// Applies a partial update to a task, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the update error if the update failed, otherwise the reload
    /// error if reloading failed.
    pub async fn mutate(&mut self, id: TaskId, patch: UpdateTaskBody) -> ClientResult<()> {
        let mutation = self.api.update(id, &patch).await.map(drop);
        self.reload_after(mutation).await
    }

    /// Flips the completion flag of a cached task, then reloads.
    ///
    /// The cached version is sent along, so a concurrent change on the
    /// server is reported instead of overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownTask`] without calling the API when the
    /// task is not cached; otherwise behaves like [`Self::mutate`].
    pub async fn toggle_complete(&mut self, id: TaskId) -> ClientResult<()> {
        let Some(task) = self.get(id) else {
            return self.record(Err(ClientError::UnknownTask(id)));
        };
        let patch = UpdateTaskBody {
            completed: Some(!task.completed()),
            version: Some(task.version().value()),
            ..UpdateTaskBody::default()
        };
        self.mutate(id, patch).await
    }

    /// Deletes a task, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the deletion error if deletion failed, otherwise the reload
    /// error if reloading failed.
    pub async fn remove(&mut self, id: TaskId) -> ClientResult<()> {
        let mutation = self.api.delete(id).await.map(drop);
        self.reload_after(mutation).await
    }

    async fn reload(&mut self) -> ClientResult<()> {
        self.tasks = self.api.list().await?;
        Ok(())
    }

    async fn reload_after(&mut self, mutation: ClientResult<()>) -> ClientResult<()> {
        let reload = self.reload().await;
        self.record(mutation.and(reload))
    }

    fn record(&mut self, outcome: ClientResult<()>) -> ClientResult<()> {
        match outcome {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "task operation failed");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
