//! Hunter daemon: wires a task registry into an executor and drives one
//! demonstration lead-discovery task end to end.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::{info, Level};

use hunter_core::{catalog, init_tracing, ExecutorError, TaskExecutor, TaskSpan};
use hunter_state::{MemoryTaskStore, TaskConfig, TaskStore};

#[tokio::main]
async fn main() -> Result<()> {
    let json_logs = std::env::var("HUNTER_LOG_FORMAT").as_deref() == Ok("json");
    init_tracing(json_logs, Level::INFO);

    info!(version = hunter_core::VERSION, "hunterd started");
    for agent in catalog() {
        info!(agent_type = %agent.agent_type, name = %agent.name, "registered agent");
    }

    let store: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new());
    let executor = TaskExecutor::new(Arc::clone(&store));

    let mut config = TaskConfig::new();
    config.insert("search_phrase".into(), json!("coffee roasters"));
    config.insert("location".into(), json!("Portland, OR"));
    config.insert("max_results".into(), json!(10));

    let record = executor.submit("sales_hunter", config).await?;
    let _span = TaskSpan::enter(&record.task_id);

    let result = loop {
        match executor.get_result(&record.task_id).await {
            Ok(result) => break result,
            Err(ExecutorError::NotReady { .. }) => {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Err(e) => return Err(e.into()),
        }
    };

    info!(
        task_id = %record.task_id,
        total_found = %result.data["total_found"],
        "demonstration task finished"
    );

    executor.shutdown().await;
    Ok(())
}
