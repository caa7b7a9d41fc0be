//! Hunter-State: Task Registry for the Hunter Agent Platform
//!
//! This crate provides the storage layer for agent task orchestration:
//! the records that describe a task's lifecycle, the `TaskStore` trait
//! every registry backend implements, and the in-process memory backend.
//!
//! ## Key Components
//!
//! - `TaskStore`: backend-agnostic registry trait
//! - `MemoryTaskStore`: in-process backend with per-task locking
//! - `TaskRecord` / `AgentResult`: lifecycle and outcome records

mod error;
pub mod memory;
mod records;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryTaskStore;
pub use records::{AgentResult, AgentStatus, TaskConfig, TaskRecord, TaskStatus};
pub use store::{StoreResult, TaskStore};
