//! Hunter Core Library
//!
//! The agent task orchestration core: the contract every agent implements,
//! the execution envelope that guarantees every run ends in exactly one
//! terminal state, and the task executor that schedules runs out-of-band
//! and tracks them through the injected task registry.

pub mod agent;
pub mod catalog;
pub mod executor;
pub mod obs;
pub mod telemetry;

pub use agent::cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use agent::contract::{Agent, AgentKind};
pub use agent::envelope::Envelope;
pub use agent::error::AgentError;
pub use agent::hunter::SalesHunterAgent;
pub use agent::mock::MockAgent;

pub use catalog::{catalog, AgentInfo};
pub use executor::{ExecutorConfig, ExecutorError, TaskExecutor};
pub use obs::{
    emit_task_cancelled, emit_task_finished, emit_task_started, emit_task_submitted, TaskSpan,
};
pub use telemetry::init_tracing;

pub use hunter_state::{
    AgentResult, AgentStatus, MemoryTaskStore, StoreError, TaskConfig, TaskRecord, TaskStatus,
    TaskStore,
};

/// Hunter core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
