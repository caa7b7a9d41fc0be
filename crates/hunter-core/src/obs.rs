//! Structured observability hooks for task lifecycle events.
//!
//! Events are emitted at `info!` level; configure verbosity via `RUST_LOG`
//! and output format via [`crate::telemetry::init_tracing`].

use tracing::info;

use hunter_state::TaskStatus;

/// RAII guard that enters a task-scoped tracing span for the duration of a
/// background run.
pub struct TaskSpan {
    _span: tracing::span::EnteredSpan,
}

impl TaskSpan {
    /// Create and enter a span tagged with the task_id.
    pub fn enter(task_id: &str) -> Self {
        let span = tracing::info_span!("hunter.task", task_id = %task_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: task accepted and recorded as pending.
pub fn emit_task_submitted(task_id: &str, agent_type: &str) {
    info!(event = "task.submitted", task_id = %task_id, agent_type = %agent_type);
}

/// Emit event: background run entered running.
pub fn emit_task_started(task_id: &str, agent_type: &str) {
    info!(event = "task.started", task_id = %task_id, agent_type = %agent_type);
}

/// Emit event: task reached a terminal status.
pub fn emit_task_finished(task_id: &str, status: TaskStatus, duration_ms: u64) {
    info!(
        event = "task.finished",
        task_id = %task_id,
        status = %status,
        duration_ms = duration_ms,
    );
}

/// Emit event: cancellation requested for an in-flight task.
pub fn emit_task_cancelled(task_id: &str) {
    info!(event = "task.cancel_requested", task_id = %task_id);
}
