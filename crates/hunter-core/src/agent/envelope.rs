//! The execution envelope: a uniform lifecycle wrapper around one agent
//! instance.
//!
//! [`Envelope::run`] never fails outward. Whatever `execute` does — return,
//! error, or get cancelled mid-flight — the caller receives exactly one
//! fully populated terminal [`AgentResult`] and needs no failure-handling
//! branch of its own.

use chrono::Utc;
use tracing::{error, info, warn};

use hunter_state::{AgentResult, AgentStatus, TaskConfig};

use crate::agent::cancel::CancelSignal;
use crate::agent::contract::{Agent, AgentKind};

/// Fixed diagnostic recorded when `validate` rejects the configuration.
pub const INVALID_CONFIG_ERROR: &str = "Invalid task configuration";

/// Fixed diagnostic recorded when a run is cancelled.
pub const CANCELLED_ERROR: &str = "Execution cancelled";

/// One agent instance plus its lifecycle state for a single run.
pub struct Envelope {
    agent_id: String,
    kind: AgentKind,
    status: AgentStatus,
    inner: Box<dyn Agent>,
}

impl Envelope {
    /// Wrap a freshly instantiated agent. Status starts at `Idle`.
    pub fn new(agent_id: impl Into<String>, kind: AgentKind) -> Self {
        let agent_id = agent_id.into();
        let inner = kind.instantiate(&agent_id);
        Self {
            agent_id,
            kind,
            status: AgentStatus::Idle,
            inner,
        }
    }

    /// Wrap a caller-supplied agent instance. Used by tests to inject
    /// probes; production code goes through [`Envelope::new`].
    pub fn with_agent(agent_id: impl Into<String>, kind: AgentKind, inner: Box<dyn Agent>) -> Self {
        Self {
            agent_id: agent_id.into(),
            kind,
            status: AgentStatus::Idle,
            inner,
        }
    }

    /// Current lifecycle status of this instance.
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    /// Drive one run to a terminal result.
    ///
    /// The envelope is authoritative for identity, status and timing: the
    /// returned result always carries this envelope's `agent_id` and
    /// `agent_type`, a terminal `status`, and a `completed_at` at or after
    /// `started_at`, regardless of what `execute` filled in.
    pub async fn run(&mut self, config: &TaskConfig, cancel: CancelSignal) -> AgentResult {
        let started_at = Utc::now();

        if !self.inner.validate(config) {
            warn!(agent_id = %self.agent_id, agent_type = %self.kind, "task configuration rejected");
            self.status = AgentStatus::Failed;
            return self.synthesize(started_at, AgentStatus::Failed, INVALID_CONFIG_ERROR);
        }

        self.status = AgentStatus::Running;
        info!(agent_id = %self.agent_id, agent_type = %self.kind, "starting agent execution");

        let outcome = tokio::select! {
            outcome = self.inner.execute(config, &cancel) => Some(outcome),
            // Dropping the execute future at this point is what keeps
            // partial side effects from ever being recorded as success.
            () = cancel.clone().cancelled() => None,
        };

        match outcome {
            Some(Ok(mut result)) => {
                self.status = AgentStatus::Completed;
                result.agent_id = self.agent_id.clone();
                result.agent_type = self.kind.as_str().to_string();
                result.status = AgentStatus::Completed;
                result.error = None;
                result.started_at = started_at;
                result.completed_at = Some(Utc::now());
                info!(agent_id = %self.agent_id, agent_type = %self.kind, "agent execution completed");
                result
            }
            None => {
                self.status = AgentStatus::Cancelled;
                warn!(agent_id = %self.agent_id, agent_type = %self.kind, "agent execution cancelled");
                self.synthesize(started_at, AgentStatus::Cancelled, CANCELLED_ERROR)
            }
            Some(Err(e)) => {
                self.status = AgentStatus::Failed;
                let message = format!("Agent execution failed: {e}");
                error!(agent_id = %self.agent_id, agent_type = %self.kind, error = %e, "agent execution failed");
                self.synthesize(started_at, AgentStatus::Failed, &message)
            }
        }
    }

    fn synthesize(
        &self,
        started_at: chrono::DateTime<Utc>,
        status: AgentStatus,
        error: &str,
    ) -> AgentResult {
        let mut result = AgentResult::new(&self.agent_id, self.kind.as_str());
        result.status = status;
        result.error = Some(error.to_string());
        result.started_at = started_at;
        result.completed_at = Some(Utc::now());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::agent::cancel::cancel_pair;
    use crate::agent::error::AgentError;

    /// Probe agent: counts execute invocations, behaviour set per test.
    struct Probe {
        valid: bool,
        calls: Arc<AtomicU32>,
        outcome: ProbeOutcome,
    }

    enum ProbeOutcome {
        Succeed,
        Fail(String),
        HangForever,
    }

    #[async_trait]
    impl Agent for Probe {
        fn validate(&self, _config: &TaskConfig) -> bool {
            self.valid
        }

        async fn execute(
            &self,
            _config: &TaskConfig,
            _cancel: &CancelSignal,
        ) -> Result<AgentResult, AgentError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match &self.outcome {
                ProbeOutcome::Succeed => {
                    let mut result = AgentResult::new("ignored", "ignored");
                    result.data.insert("result".into(), serde_json::json!("success"));
                    Ok(result)
                }
                ProbeOutcome::Fail(msg) => Err(AgentError::Execution(msg.clone())),
                ProbeOutcome::HangForever => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn probe_envelope(valid: bool, outcome: ProbeOutcome) -> (Envelope, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let probe = Probe {
            valid,
            calls: Arc::clone(&calls),
            outcome,
        };
        (
            Envelope::with_agent("task-1", AgentKind::Mock, Box::new(probe)),
            calls,
        )
    }

    #[tokio::test]
    async fn test_invalid_config_short_circuits() {
        let (mut envelope, calls) = probe_envelope(false, ProbeOutcome::Succeed);
        let (_handle, signal) = cancel_pair();

        let result = envelope.run(&TaskConfig::new(), signal).await;

        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(result.error.as_deref(), Some(INVALID_CONFIG_ERROR));
        assert!(result.completed_at.is_some());
        assert_eq!(calls.load(Ordering::Relaxed), 0, "execute must not run");
        assert_eq!(envelope.status(), AgentStatus::Failed);
    }

    #[tokio::test]
    async fn test_success_forces_status_and_timing() {
        let (mut envelope, calls) = probe_envelope(true, ProbeOutcome::Succeed);
        let (_handle, signal) = cancel_pair();

        let result = envelope.run(&TaskConfig::new(), signal).await;

        assert_eq!(result.status, AgentStatus::Completed);
        // Identity is the envelope's, not whatever the agent filled in.
        assert_eq!(result.agent_id, "task-1");
        assert_eq!(result.agent_type, "mock");
        assert!(result.error.is_none());
        assert!(result.completed_at.unwrap() >= result.started_at);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(envelope.status(), AgentStatus::Completed);
    }

    #[tokio::test]
    async fn test_execute_error_maps_to_failed() {
        let (mut envelope, _calls) = probe_envelope(true, ProbeOutcome::Fail("source down".into()));
        let (_handle, signal) = cancel_pair();

        let result = envelope.run(&TaskConfig::new(), signal).await;

        assert_eq!(result.status, AgentStatus::Failed);
        assert_eq!(
            result.error.as_deref(),
            Some("Agent execution failed: source down")
        );
        assert!(result.completed_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_maps_to_cancelled_not_failed() {
        let (mut envelope, calls) = probe_envelope(true, ProbeOutcome::HangForever);
        let (handle, signal) = cancel_pair();

        let run = tokio::spawn(async move { envelope.run(&TaskConfig::new(), signal).await });

        // Let the run reach its suspension point, then cancel.
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        let result = run.await.unwrap();
        assert_eq!(result.status, AgentStatus::Cancelled);
        assert_eq!(result.error.as_deref(), Some(CANCELLED_ERROR));
        assert_eq!(calls.load(Ordering::Relaxed), 1, "execute had started");
    }
}
