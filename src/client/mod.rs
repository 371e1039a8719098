//! Typed client for the task API.
//!
//! [`TaskCache`] is the owning client-side store: it holds the task list the
//! user sees, the message of the last failure, and reloads from the server
//! after every change. [`HttpTaskApi`] is the production transport; tests
//! substitute their own [`TaskApi`].

mod api;
mod cache;

pub use api::{ClientError, ClientResult, HttpTaskApi, TaskApi};
pub use cache::{TaskCache, TaskCounts};
