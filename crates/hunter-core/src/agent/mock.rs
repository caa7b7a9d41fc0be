//! Deterministic agent for exercising the executor end to end.
//!
//! Registered in the dispatch table as `"mock"` so integration tests run
//! through the same submission and dispatch path as production agents.
//!
//! Config keys:
//! - `required_field` (string, required, non-empty)
//! - `delay_ms` (optional) — awaited before finishing, to hold the task in
//!   `running` long enough to observe or cancel it
//! - `fail_with` (optional string) — execution fails with this message

use async_trait::async_trait;
use serde_json::{json, Value};

use hunter_state::{AgentResult, TaskConfig};

use crate::agent::cancel::CancelSignal;
use crate::agent::contract::Agent;
use crate::agent::error::AgentError;

pub struct MockAgent {
    agent_id: String,
}

impl MockAgent {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
        }
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn validate(&self, config: &TaskConfig) -> bool {
        config
            .get("required_field")
            .and_then(Value::as_str)
            .map_or(false, |s| !s.trim().is_empty())
    }

    async fn execute(
        &self,
        config: &TaskConfig,
        _cancel: &CancelSignal,
    ) -> Result<AgentResult, AgentError> {
        if let Some(delay_ms) = config.get("delay_ms").and_then(Value::as_u64) {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        }

        if let Some(message) = config.get("fail_with").and_then(Value::as_str) {
            return Err(AgentError::Execution(message.to_string()));
        }

        let mut result = AgentResult::new(&self.agent_id, "mock");
        result.data.insert("result".into(), json!("success"));
        Ok(result)
    }
}
