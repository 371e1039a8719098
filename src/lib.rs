//! Taskboard: a task management REST API and its typed client.
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: validated task records with no infrastructure dependencies
//! - **Ports**: the [`task::ports::TaskRepository`] trait
//! - **Adapters**: in-memory and `PostgreSQL` repositories
//!
//! # Modules
//!
//! - [`task`]: task domain, storage and CRUD service
//! - [`http`]: axum router exposing the service as JSON over HTTP
//! - [`client`]: reqwest client and the client-side task cache
//! - [`config`]: command-line and environment configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod client;
pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
