//! Application services for task management.

mod crud;

pub use crud::{
    CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult, UpdateTaskRequest,
};
