//! Router assembly and shared handler state.

use super::{
    auth::{BearerToken, require_bearer},
    handlers,
};
use crate::task::{ports::TaskRepository, services::TaskService};
use axum::{Router, middleware, routing::get};
use mockable::Clock;
use tower_http::trace::TraceLayer;

/// State shared by every handler.
pub struct AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Task service the handlers delegate to.
    pub service: TaskService<R, C>,
    /// Token required on task routes; `None` leaves them open.
    pub api_token: Option<BearerToken>,
}

impl<R, C> AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates state with the task routes left open.
    #[must_use]
    pub const fn new(service: TaskService<R, C>) -> Self {
        Self {
            service,
            api_token: None,
        }
    }

    /// Requires `Authorization: Bearer <token>` on every task route.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(BearerToken::new(token.into()));
        self
    }
}

impl<R, C> Clone for AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            api_token: self.api_token.clone(),
        }
    }
}

/// Builds the application router.
///
/// Task routes live under `/api/tasks`; `/health` is never gated. Unknown
/// paths answer 404 and unsupported methods 405, both with the failure
/// envelope.
pub fn router<R, C>(state: AppState<R, C>) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mut tasks = Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks::<R, C>).post(handlers::create_task::<R, C>),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task::<R, C>)
                .put(handlers::update_task::<R, C>)
                .delete(handlers::delete_task::<R, C>),
        );

    if let Some(token) = state.api_token.clone() {
        tasks = tasks.route_layer(middleware::from_fn_with_state(token, require_bearer));
    }

    Router::new()
        .route("/health", get(handlers::health))
        .merge(tasks)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
