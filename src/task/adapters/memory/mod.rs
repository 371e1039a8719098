//! In-memory adapter implementations.
//!
//! These adapters provide a simple, thread-safe store suitable for unit
//! testing and for running the server without a database.

mod task;

pub use task::InMemoryTaskRepository;
