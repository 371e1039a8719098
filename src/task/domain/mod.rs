//! Domain model for task management.
//!
//! The domain holds the task aggregate and its validated values. Everything
//! that touches storage or transport lives outside this boundary.

mod due_date;
mod error;
mod ids;
mod task;
mod text;

pub use due_date::DueDate;
pub use error::TaskDomainError;
pub use ids::{TaskId, TaskVersion};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges};
pub use text::{TaskDescription, TaskTitle};
