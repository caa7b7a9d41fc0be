//! Task executor: accepts submissions, dispatches to the closed agent set,
//! runs each task out-of-band and drives its registry record to a terminal
//! status.
//!
//! The registry is injected at construction; the executor holds only a
//! transient reference to any record while writing it and keeps no agent
//! alive beyond its one run.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use hunter_state::{AgentResult, StoreError, TaskConfig, TaskRecord, TaskStatus, TaskStore};

use crate::agent::cancel::{cancel_pair, CancelHandle, CancelSignal};
use crate::agent::contract::AgentKind;
use crate::agent::envelope::Envelope;
use crate::obs::{emit_task_cancelled, emit_task_finished, emit_task_started, emit_task_submitted};

/// Errors surfaced to the executor's direct callers.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The submitted type tag is not in the dispatch table. No record was
    /// created; correct the type and resubmit.
    #[error("unknown agent type: {agent_type}")]
    UnknownAgentType { agent_type: String },

    /// The task has not reached a terminal status yet. Retry-able.
    #[error("task {task_id} is still {status}")]
    NotReady { task_id: String, status: TaskStatus },

    /// The task reached a terminal failure (failed or cancelled).
    #[error("task {task_id} execution failed: {error}")]
    TaskFailed { task_id: String, error: String },

    /// Registry inconsistency (duplicate id, missing id, bad transition).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Executor-wide policy knobs.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Deadline applied to every task, expressed as externally triggered
    /// cancellation. `None` means run indefinitely.
    pub default_timeout_ms: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: None,
        }
    }
}

/// Accepts task submissions and runs them asynchronously.
pub struct TaskExecutor {
    store: Arc<dyn TaskStore>,
    config: ExecutorConfig,
    /// Cancellation handles for in-flight tasks, removed when a run ends.
    in_flight: Mutex<HashMap<String, CancelHandle>>,
}

impl TaskExecutor {
    pub fn new(store: Arc<dyn TaskStore>) -> Arc<Self> {
        Self::with_config(store, ExecutorConfig::default())
    }

    pub fn with_config(store: Arc<dyn TaskStore>, config: ExecutorConfig) -> Arc<Self> {
        Arc::new(Self {
            store,
            config,
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Submit a task. Returns the pending record immediately; the run
    /// proceeds out-of-band.
    ///
    /// Fails with [`ExecutorError::UnknownAgentType`] before any registry
    /// write if `agent_type` is not in the dispatch table.
    pub async fn submit(
        self: &Arc<Self>,
        agent_type: &str,
        config: TaskConfig,
    ) -> Result<TaskRecord, ExecutorError> {
        let kind =
            AgentKind::from_str(agent_type).map_err(|_| ExecutorError::UnknownAgentType {
                agent_type: agent_type.to_string(),
            })?;

        let task_id = Uuid::new_v4().to_string();
        let record = self.store.create(&task_id, kind.as_str(), config.clone()).await?;
        emit_task_submitted(&task_id, kind.as_str());

        let (handle, signal) = cancel_pair();
        self.in_flight.lock().await.insert(task_id.clone(), handle);

        if let Some(timeout_ms) = self.config.default_timeout_ms {
            tokio::spawn(Arc::clone(self).arm_deadline(task_id.clone(), timeout_ms));
        }
        tokio::spawn(Arc::clone(self).drive(task_id, kind, config, signal));

        Ok(record)
    }

    /// Current record for a task. Read-through to the registry.
    pub async fn get_status(&self, task_id: &str) -> Result<TaskRecord, ExecutorError> {
        Ok(self.store.get(task_id).await?)
    }

    /// Final result of a completed task.
    ///
    /// While the task is `pending`/`running` this is [`ExecutorError::NotReady`]
    /// (retry later); for `failed` and `cancelled` it is
    /// [`ExecutorError::TaskFailed`] carrying the stored diagnostic.
    pub async fn get_result(&self, task_id: &str) -> Result<AgentResult, ExecutorError> {
        let record = self.store.get(task_id).await?;
        match record.status {
            TaskStatus::Pending | TaskStatus::Running => Err(ExecutorError::NotReady {
                task_id: task_id.to_string(),
                status: record.status,
            }),
            TaskStatus::Completed => record.result.ok_or_else(|| ExecutorError::TaskFailed {
                task_id: task_id.to_string(),
                error: "completed task has no stored result".to_string(),
            }),
            TaskStatus::Failed | TaskStatus::Cancelled => Err(ExecutorError::TaskFailed {
                task_id: task_id.to_string(),
                error: record.error.unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }

    /// All known tasks in creation order.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRecord>, ExecutorError> {
        Ok(self.store.list().await?)
    }

    /// Request cooperative cancellation of an in-flight task.
    ///
    /// Returns `true` if a cancellation was delivered, `false` if the task
    /// had already reached a terminal status. Unknown ids fail with the
    /// registry's not-found error.
    pub async fn cancel(&self, task_id: &str) -> Result<bool, ExecutorError> {
        let record = self.store.get(task_id).await?;
        if record.status.is_terminal() {
            return Ok(false);
        }
        let in_flight = self.in_flight.lock().await;
        match in_flight.get(task_id) {
            Some(handle) => {
                handle.cancel();
                emit_task_cancelled(task_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Cancel every in-flight task. Each affected run terminates
    /// `cancelled` at its next suspension point.
    pub async fn shutdown(&self) {
        let in_flight = self.in_flight.lock().await;
        for (task_id, handle) in in_flight.iter() {
            handle.cancel();
            emit_task_cancelled(task_id);
        }
    }

    async fn arm_deadline(self: Arc<Self>, task_id: String, timeout_ms: u64) {
        tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
        let in_flight = self.in_flight.lock().await;
        if let Some(handle) = in_flight.get(&task_id) {
            warn!(task_id = %task_id, timeout_ms, "task deadline elapsed, cancelling");
            handle.cancel();
        }
    }

    /// Background run for one task. Must never leave the record stuck in
    /// `pending`/`running`: any failure in the drive path itself is caught
    /// and written back as `failed`.
    #[instrument(skip(self, config, cancel), fields(task_id = %task_id, agent_type = %kind))]
    async fn drive(
        self: Arc<Self>,
        task_id: String,
        kind: AgentKind,
        config: TaskConfig,
        cancel: CancelSignal,
    ) {
        let started = Instant::now();

        if let Err(e) = self.run_task(&task_id, kind, &config, cancel).await {
            error!(task_id = %task_id, error = %e, "task driver failed");
            // Best effort: the record may already be terminal if the final
            // status write itself was what failed.
            let _ = self
                .store
                .update_status(
                    &task_id,
                    TaskStatus::Failed,
                    None,
                    Some(format!("Task driver failed: {e}")),
                )
                .await;
        }

        self.in_flight.lock().await.remove(&task_id);

        if let Ok(record) = self.store.get(&task_id).await {
            emit_task_finished(&task_id, record.status, started.elapsed().as_millis() as u64);
        }
    }

    async fn run_task(
        &self,
        task_id: &str,
        kind: AgentKind,
        config: &TaskConfig,
        cancel: CancelSignal,
    ) -> Result<(), ExecutorError> {
        self.store
            .update_status(task_id, TaskStatus::Running, None, None)
            .await?;
        emit_task_started(task_id, kind.as_str());

        let mut envelope = Envelope::new(task_id, kind);
        let result = envelope.run(config, cancel).await;

        let status = TaskStatus::from(result.status);
        let error = result.error.clone();
        // The record keeps the full result only on success; failures and
        // cancellations are represented by status + error.
        let stored = (status == TaskStatus::Completed).then_some(result);
        self.store
            .update_status(task_id, status, stored, error)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunter_state::MemoryTaskStore;

    #[test]
    fn test_config_defaults_to_no_timeout() {
        assert!(ExecutorConfig::default().default_timeout_ms.is_none());
    }

    #[tokio::test]
    async fn test_unknown_agent_type_rejected_before_any_write() {
        let store = Arc::new(MemoryTaskStore::new());
        let executor = TaskExecutor::new(Arc::clone(&store) as Arc<dyn TaskStore>);

        let err = executor
            .submit("not_a_real_type", TaskConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::UnknownAgentType { .. }));
        assert!(executor.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_status_unknown_id_is_store_error() {
        let store = Arc::new(MemoryTaskStore::new());
        let executor = TaskExecutor::new(store as Arc<dyn TaskStore>);

        let err = executor.get_status("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::Store(StoreError::TaskNotFound { .. })
        ));
    }
}
