//! Client-side port for the task API and its reqwest implementation.

use crate::http::{CreateTaskBody, Envelope, UpdateTaskBody};
use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`TaskApi`] implementations.
///
/// The `Display` form of [`ClientError::Api`] is the server's `error` string
/// verbatim, so it can be shown to users as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a failure status or envelope.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// The server's `error` string, or a generic description.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected envelope.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The task is not present in the local cache.
    #[error("task {0} is not in the local task list")]
    UnknownTask(TaskId),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Remote task API as seen by the client.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches every task, newest first.
    async fn list(&self) -> ClientResult<Vec<Task>>;

    /// Creates a task.
    async fn create(&self, body: &CreateTaskBody) -> ClientResult<Task>;

    /// Partially updates a task.
    async fn update(&self, id: TaskId, body: &UpdateTaskBody) -> ClientResult<Task>;

    /// Deletes a task and returns the server's confirmation message.
    async fn delete(&self, id: TaskId) -> ClientResult<String>;
}

/// [`TaskApi`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpTaskApi {
    /// Creates a client for the server at `base_url`, e.g.
    /// `http://127.0.0.1:3000`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            bearer_token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/api/tasks/{id}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<Envelope<T>> {
        let mut builder = request;
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "task api response");

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(parsed) if status.is_success() && parsed.success => Ok(parsed),
            Ok(parsed) => Err(ClientError::Api {
                status: status.as_u16(),
                message: parsed
                    .error
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            }),
            Err(_) if !status.is_success() => Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("request failed with status {status}"),
            }),
            Err(err) => Err(ClientError::Decode(err)),
        }
    }
}

fn require_data<T>(envelope: Envelope<T>) -> ClientResult<T> {
    envelope.data.ok_or_else(|| {
        ClientError::Decode(serde::de::Error::missing_field("data"))
    })
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> ClientResult<Vec<Task>> {
        let envelope = self.send(self.client.get(self.tasks_url())).await?;
        require_data(envelope)
    }

    async fn create(&self, body: &CreateTaskBody) -> ClientResult<Task> {
        let envelope = self
            .send(self.client.post(self.tasks_url()).json(body))
            .await?;
        require_data(envelope)
    }

    async fn update(&self, id: TaskId, body: &UpdateTaskBody) -> ClientResult<Task> {
        let envelope = self
            .send(self.client.put(self.task_url(id)).json(body))
            .await?;
        require_data(envelope)
    }

    async fn delete(&self, id: TaskId) -> ClientResult<String> {
        let envelope: Envelope<serde::de::IgnoredAny> =
            self.send(self.client.delete(self.task_url(id))).await?;
        Ok(envelope.message.unwrap_or_default())
    }
}
