//! Agent execution lifecycle.
//!
//! # Module layout
//!
//! - [`contract`] — `Agent` trait, `AgentKind` dispatch table
//! - [`cancel`] — `CancelHandle` / `CancelSignal` cooperative cancellation
//! - [`envelope`] — `Envelope`, the infallible lifecycle wrapper
//! - [`error`] — `AgentError`
//! - [`hunter`] — `SalesHunterAgent`, lead discovery
//! - [`mock`] — `MockAgent`, deterministic agent for integration tests

pub mod cancel;
pub mod contract;
pub mod envelope;
pub mod error;
pub mod hunter;
pub mod mock;
