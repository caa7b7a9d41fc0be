//! Error types for the task registry.

use thiserror::Error;

/// Errors produced by registry backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A task with this id already exists.
    #[error("task already exists: {task_id}")]
    DuplicateTask { task_id: String },

    /// No task with this id.
    #[error("task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// A status write would move the task backwards in its lifecycle.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: String,
        from: String,
        to: String,
    },
}
