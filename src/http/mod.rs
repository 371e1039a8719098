//! HTTP/JSON interface for task management.
//!
//! Handlers are stateless: each request parses its path and body, calls the
//! [`TaskService`](crate::task::services::TaskService), and renders the
//! outcome as an [`Envelope`]. Status codes follow the outcome:
//!
//! | Outcome | Status |
//! |---|---|
//! | read, update or delete succeeded | 200 |
//! | create succeeded | 201 |
//! | validation failure | 400 |
//! | missing or wrong bearer token | 401 |
//! | unknown task or route | 404 |
//! | stale version | 409 |
//! | store failure | 500 |

pub mod auth;
pub mod dto;
pub mod envelope;
mod error;
mod handlers;
mod router;

pub use dto::{CreateTaskBody, UpdateTaskBody};
pub use envelope::Envelope;
pub use error::ApiError;
pub use router::{AppState, router};
