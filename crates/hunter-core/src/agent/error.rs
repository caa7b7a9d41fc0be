//! Error types for agent execution.

/// Failures raised by an agent's `execute`.
///
/// These never escape the execution envelope; it maps them to a terminal
/// failed result with a descriptive message.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("data source {source_name} unavailable: {reason}")]
    SourceUnavailable {
        source_name: String,
        reason: String,
    },

    #[error("{0}")]
    Execution(String),
}
