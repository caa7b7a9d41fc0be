//! The contract every executable unit of work implements, and the closed
//! dispatch table that maps type tags to concrete agents.

use async_trait::async_trait;

use hunter_state::{AgentResult, TaskConfig};

use crate::agent::cancel::CancelSignal;
use crate::agent::error::AgentError;
use crate::agent::hunter::SalesHunterAgent;
use crate::agent::mock::MockAgent;

/// Capability every agent type provides.
///
/// Implementations are constructed per task with `agent_id = task_id` and
/// discarded after one run; they are never shared across concurrent runs.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Pure, synchronous check that `config` carries the fields this agent
    /// type requires. Returns `false` rather than erroring: a bad
    /// configuration is an expected outcome, not an exceptional one.
    fn validate(&self, config: &TaskConfig) -> bool;

    /// Perform the unit of work. May suspend at I/O boundaries; `cancel`
    /// should be checked between work phases so a cancelled run unwinds
    /// without recording partial effects as success.
    ///
    /// On inability to complete, return `Err` — the envelope turns the
    /// failure into a terminal result; never return a partially populated
    /// success.
    async fn execute(
        &self,
        config: &TaskConfig,
        cancel: &CancelSignal,
    ) -> Result<AgentResult, AgentError>;
}

/// Closed set of known agent types.
///
/// The executor dispatches over this enum; adding an agent means adding a
/// variant here, not registering a plugin at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    SalesHunter,
    Mock,
}

impl AgentKind {
    pub const ALL: [AgentKind; 2] = [AgentKind::SalesHunter, AgentKind::Mock];

    /// The wire type tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::SalesHunter => "sales_hunter",
            AgentKind::Mock => "mock",
        }
    }

    /// Construct the concrete agent for one run.
    pub fn instantiate(&self, agent_id: &str) -> Box<dyn Agent> {
        match self {
            AgentKind::SalesHunter => Box::new(SalesHunterAgent::new(agent_id)),
            AgentKind::Mock => Box::new(MockAgent::new(agent_id)),
        }
    }
}

impl std::str::FromStr for AgentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales_hunter" => Ok(AgentKind::SalesHunter),
            "mock" => Ok(AgentKind::Mock),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
