//! Optional bearer-token gate for the task routes.

use super::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// Shared secret that requests must present as `Authorization: Bearer …`.
#[derive(Clone)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    /// Wraps the configured token.
    #[must_use]
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    fn matches(&self, presented: &str) -> bool {
        self.0.len() == presented.len()
            && self
                .0
                .bytes()
                .zip(presented.bytes())
                .fold(0_u8, |acc, (expected, actual)| acc | (expected ^ actual))
                == 0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(****)")
    }
}

/// Rejects requests that do not carry the configured bearer token.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] when the header is missing, is not a
/// bearer credential, or carries a different token.
pub async fn require_bearer(
    State(token): State<BearerToken>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(candidate) if token.matches(candidate) => Ok(next.run(request).await),
        _ => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected unauthenticated request"
            );
            Err(ApiError::Unauthenticated)
        }
    }
}
