//! Task and agent lifecycle records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque key-value configuration for a task. Owned by the registry after
/// submission and never mutated by the core.
pub type TaskConfig = serde_json::Map<String, serde_json::Value>;

/// Status of a single agent execution.
///
/// `Idle` is the only initial value; `Running` is entered exactly once;
/// `Completed`, `Failed` and `Cancelled` are mutually exclusive terminal
/// values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl AgentStatus {
    /// Whether no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentStatus::Completed | AgentStatus::Failed | AgentStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Running => "running",
            AgentStatus::Completed => "completed",
            AgentStatus::Failed => "failed",
            AgentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome record of one agent execution.
///
/// Immutable after creation. The execution envelope is authoritative for
/// `status` and `completed_at`: `completed_at` is set if and only if the
/// status is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentResult {
    /// Stable identifier of the running instance (doubles as the task id).
    pub agent_id: String,

    /// Type tag naming the concrete agent behaviour.
    pub agent_type: String,

    /// Terminal status assigned by the envelope.
    pub status: AgentStatus,

    /// Domain output (empty until populated by the agent).
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,

    /// Present iff status is `failed` or `cancelled`.
    pub error: Option<String>,

    /// When execution started.
    pub started_at: DateTime<Utc>,

    /// When execution finished (None while in flight).
    pub completed_at: Option<DateTime<Utc>>,

    /// Auxiliary execution info (e.g. source counts).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl AgentResult {
    /// Create a fresh in-flight result with empty data and metadata.
    pub fn new(agent_id: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_type: agent_type.into(),
            status: AgentStatus::Idle,
            data: serde_json::Map::new(),
            error: None,
            started_at: Utc::now(),
            completed_at: None,
            metadata: serde_json::Map::new(),
        }
    }
}

/// Status of a submitted task.
///
/// Mirrors [`AgentStatus`] with `pending` in place of `idle`: a task exists
/// in the registry before any agent instance does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Whether no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    /// Textual form for external consumption.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Lifecycle rank used to reject backward transitions.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Running => 1,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled => 2,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<AgentStatus> for TaskStatus {
    fn from(status: AgentStatus) -> Self {
        match status {
            // An idle agent maps to a task that has not started yet.
            AgentStatus::Idle => TaskStatus::Pending,
            AgentStatus::Running => TaskStatus::Running,
            AgentStatus::Completed => TaskStatus::Completed,
            AgentStatus::Failed => TaskStatus::Failed,
            AgentStatus::Cancelled => TaskStatus::Cancelled,
        }
    }
}

/// A single registry entry for a submitted task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    /// Unique id assigned at submission, never reused.
    pub task_id: String,

    /// Agent type tag this task dispatches to.
    pub agent_type: String,

    /// Input parameters, frozen at submission.
    pub config: TaskConfig,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Execution outcome, set only on success.
    pub result: Option<AgentResult>,

    /// Failure diagnostic, set only on failure or cancellation.
    pub error: Option<String>,

    /// When the task was submitted.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every status transition, non-decreasing.
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Create a fresh pending record.
    pub fn new(
        task_id: impl Into<String>,
        agent_type: impl Into<String>,
        config: TaskConfig,
    ) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            agent_type: agent_type.into(),
            config,
            status: TaskStatus::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}
