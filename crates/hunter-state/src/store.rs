//! Registry trait definition.
//!
//! `TaskStore` is the single source of truth for "what is the status of
//! task X". The trait is async and backend-agnostic; the in-memory backend
//! in [`crate::memory`] is the default in-process implementation.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::records::{AgentResult, TaskConfig, TaskRecord, TaskStatus};

/// Result type for registry operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Task registry.
///
/// Guarantees:
/// - Task ids are unique; `create` on an existing id fails.
/// - Status transitions per id are monotonic: pending -> running ->
///   terminal, never backward; terminal records are frozen.
/// - `updated_at` is non-decreasing across observed reads of one id.
/// - Operations on different task ids do not block each other; operations
///   on the same id are linearizable.
/// - Records are never deleted; retention is an external concern.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new pending record. Fails with [`StoreError::DuplicateTask`]
    /// if the id already exists.
    async fn create(
        &self,
        task_id: &str,
        agent_type: &str,
        config: TaskConfig,
    ) -> StoreResult<TaskRecord>;

    /// Overwrite status, result and error for an existing task and refresh
    /// `updated_at`. Fails with [`StoreError::TaskNotFound`] if absent and
    /// [`StoreError::InvalidTransition`] on a backward lifecycle move.
    async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        result: Option<AgentResult>,
        error: Option<String>,
    ) -> StoreResult<TaskRecord>;

    /// Retrieve a record by id. Fails with [`StoreError::TaskNotFound`]
    /// if absent.
    async fn get(&self, task_id: &str) -> StoreResult<TaskRecord>;

    /// All records in creation order.
    async fn list(&self) -> StoreResult<Vec<TaskRecord>>;
}
