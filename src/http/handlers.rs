//! Request handlers for the task routes.

use super::{
    dto::{CreateTaskBody, UpdateTaskBody},
    envelope::Envelope,
    error::ApiError,
    router::AppState,
};
use crate::task::{
    domain::{Task, TaskId},
    ports::TaskRepository,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{Method, StatusCode, Uri},
};
use mockable::Clock;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

type IdPath = Result<Path<String>, PathRejection>;

fn parse_id(path: IdPath) -> Result<TaskId, ApiError> {
    let Path(raw) = path?;
    TaskId::parse(&raw).map_err(|err| ApiError::Validation(err.to_string()))
}

/// `GET /api/tasks`
pub async fn list_tasks<R, C>(State(state): State<AppState<R, C>>) -> ApiResult<Vec<Task>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks = state
        .service
        .list()
        .await
        .map_err(|err| ApiError::from_service("list tasks", err))?;
    let message = format!("{} task(s) found", tasks.len());
    Ok(Json(Envelope::ok(tasks, message)))
}

/// `POST /api/tasks`
pub async fn create_task<R, C>(
    State(state): State<AppState<R, C>>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Task>>), ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = body?;
    let task = state
        .service
        .create(body.into())
        .await
        .map_err(|err| ApiError::from_service("create task", err))?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(task, "task created")),
    ))
}

/// `GET /api/tasks/{id}`
pub async fn get_task<R, C>(
    State(state): State<AppState<R, C>>,
    path: IdPath,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(path)?;
    let task = state
        .service
        .get(id)
        .await
        .map_err(|err| ApiError::from_service("get task", err))?;
    Ok(Json(Envelope::ok(task, "task found")))
}

/// `PUT /api/tasks/{id}`
pub async fn update_task<R, C>(
    State(state): State<AppState<R, C>>,
    path: IdPath,
    body: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(path)?;
    let Json(body) = body?;
    let task = state
        .service
        .update(id, body.into())
        .await
        .map_err(|err| ApiError::from_service("update task", err))?;
    Ok(Json(Envelope::ok(task, "task updated")))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task<R, C>(
    State(state): State<AppState<R, C>>,
    path: IdPath,
) -> ApiResult<Task>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(path)?;
    let task = state
        .service
        .delete(id)
        .await
        .map_err(|err| ApiError::from_service("delete task", err))?;
    Ok(Json(Envelope::message(format!(
        "task \"{}\" deleted",
        task.title()
    ))))
}

/// `GET /health`
#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
pub async fn health() -> Json<Envelope<()>> {
    Json(Envelope::message("ok"))
}

/// Fallback for unknown routes.
#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

/// Fallback for known routes hit with an unsupported method.
#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} is not allowed on {}", uri.path()))
}
