//! In-process registry backend.
//!
//! `MemoryTaskStore` keeps one lock per task record under an outer map
//! lock, so writers touching different task ids never contend beyond the
//! brief map access, while all access to a single id is linearized through
//! that record's own lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreError;
use crate::records::{AgentResult, TaskConfig, TaskRecord, TaskStatus};
use crate::store::{StoreResult, TaskStore};

#[derive(Debug, Default)]
struct Inner {
    tasks: HashMap<String, Arc<RwLock<TaskRecord>>>,
    /// Insertion order for `list()`.
    order: Vec<String>,
}

/// In-memory task registry.
///
/// Construct once at process start and inject into the executor; the store
/// is not a module-level singleton.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_lock(&self, task_id: &str) -> StoreResult<Arc<RwLock<TaskRecord>>> {
        let inner = self.inner.read().expect("task map lock poisoned");
        inner
            .tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(
        &self,
        task_id: &str,
        agent_type: &str,
        config: TaskConfig,
    ) -> StoreResult<TaskRecord> {
        let record = TaskRecord::new(task_id, agent_type, config);
        let mut inner = self.inner.write().expect("task map lock poisoned");
        if inner.tasks.contains_key(task_id) {
            return Err(StoreError::DuplicateTask {
                task_id: task_id.to_string(),
            });
        }
        inner
            .tasks
            .insert(task_id.to_string(), Arc::new(RwLock::new(record.clone())));
        inner.order.push(task_id.to_string());
        Ok(record)
    }

    async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        result: Option<AgentResult>,
        error: Option<String>,
    ) -> StoreResult<TaskRecord> {
        let lock = self.record_lock(task_id)?;
        let mut record = lock.write().expect("task record lock poisoned");

        // Safety net: the executor is trusted to drive valid transitions,
        // but a backward move or a write to a frozen terminal record is
        // always a bug worth failing loudly on.
        if record.status.is_terminal() || status.rank() < record.status.rank() {
            return Err(StoreError::InvalidTransition {
                task_id: task_id.to_string(),
                from: record.status.to_string(),
                to: status.to_string(),
            });
        }

        record.status = status;
        record.result = result;
        record.error = error;
        // Clamp so updated_at never moves backwards under clock skew.
        record.updated_at = Utc::now().max(record.updated_at);
        Ok(record.clone())
    }

    async fn get(&self, task_id: &str) -> StoreResult<TaskRecord> {
        let lock = self.record_lock(task_id)?;
        let record = lock.read().expect("task record lock poisoned");
        Ok(record.clone())
    }

    async fn list(&self) -> StoreResult<Vec<TaskRecord>> {
        let inner = self.inner.read().expect("task map lock poisoned");
        let records = inner
            .order
            .iter()
            .filter_map(|id| inner.tasks.get(id))
            .map(|lock| lock.read().expect("task record lock poisoned").clone())
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TaskConfig {
        let mut map = TaskConfig::new();
        map.insert("search_phrase".into(), serde_json::json!("dentists"));
        map
    }

    #[tokio::test]
    async fn test_create_inserts_pending() {
        let store = MemoryTaskStore::new();
        let record = store.create("t1", "sales_hunter", config()).await.unwrap();
        assert_eq!(record.status, TaskStatus::Pending);
        assert_eq!(record.agent_type, "sales_hunter");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let store = MemoryTaskStore::new();
        store.create("t1", "mock", TaskConfig::new()).await.unwrap();
        let err = store
            .create("t1", "mock", TaskConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTask { .. }));
    }

    #[tokio::test]
    async fn test_get_missing_fails() {
        let store = MemoryTaskStore::new();
        let err = store.get("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound { .. }));
    }

    #[tokio::test]
    async fn test_backward_transition_rejected() {
        let store = MemoryTaskStore::new();
        store.create("t1", "mock", TaskConfig::new()).await.unwrap();
        store
            .update_status("t1", TaskStatus::Running, None, None)
            .await
            .unwrap();
        let err = store
            .update_status("t1", TaskStatus::Pending, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_terminal_record_is_frozen() {
        let store = MemoryTaskStore::new();
        store.create("t1", "mock", TaskConfig::new()).await.unwrap();
        store
            .update_status("t1", TaskStatus::Running, None, None)
            .await
            .unwrap();
        store
            .update_status("t1", TaskStatus::Cancelled, None, Some("Execution cancelled".into()))
            .await
            .unwrap();
        let err = store
            .update_status("t1", TaskStatus::Completed, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryTaskStore::new();
        for id in ["a", "b", "c"] {
            store.create(id, "mock", TaskConfig::new()).await.unwrap();
        }
        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.task_id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
