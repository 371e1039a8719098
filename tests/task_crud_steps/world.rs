//! Shared world state for task CRUD BDD scenarios.

use crate::test_helpers::{memory_state, send};
use axum::{
    Router,
    http::{Method, StatusCode},
};
use rstest::fixture;
use serde_json::Value;
use taskboard::http::router;

/// Scenario world for task CRUD behaviour tests.
pub struct TaskBoardWorld {
    pub app: Router,
    pub last_task_id: Option<i64>,
    pub last_status: Option<StatusCode>,
    pub last_body: Option<Value>,
}

impl TaskBoardWorld {
    /// Creates a world around an open, empty task board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: router(memory_state()),
            last_task_id: None,
            last_status: None,
            last_body: None,
        }
    }

    /// Sends a request and records the response.
    pub fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> Result<(), eyre::Report> {
        let (status, json) = run_async(send(&self.app, method, uri, body, None))?;
        if let Some(id) = json["data"]["id"].as_i64() {
            self.last_task_id = Some(id);
        }
        self.last_status = Some(status);
        self.last_body = Some(json);
        Ok(())
    }

    /// Returns the URI of the most recently created task.
    pub fn last_task_uri(&self) -> Result<String, eyre::Report> {
        let id = self
            .last_task_id
            .ok_or_else(|| eyre::eyre!("no task has been created in this scenario"))?;
        Ok(format!("/api/tasks/{id}"))
    }

    /// Returns the most recent response body.
    pub fn body(&self) -> Result<&Value, eyre::Report> {
        self.last_body
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no request has been sent in this scenario"))
    }
}

impl Default for TaskBoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskBoardWorld {
    TaskBoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
