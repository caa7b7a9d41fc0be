//! Descriptive catalog of the registered agent types.

use serde::{Deserialize, Serialize};

use crate::agent::contract::AgentKind;
use crate::VERSION;

/// Human-readable description of one agent type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentInfo {
    pub agent_type: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub capabilities: Vec<String>,
}

impl AgentKind {
    /// Catalog entry for this kind.
    pub fn info(&self) -> AgentInfo {
        match self {
            AgentKind::SalesHunter => AgentInfo {
                agent_type: self.as_str().to_string(),
                name: "Sales Hunter".to_string(),
                description: "Finds business leads for a search phrase around a location"
                    .to_string(),
                version: VERSION.to_string(),
                capabilities: vec![
                    "lead_discovery".to_string(),
                    "deduplication".to_string(),
                    "lead_scoring".to_string(),
                ],
            },
            AgentKind::Mock => AgentInfo {
                agent_type: self.as_str().to_string(),
                name: "Mock".to_string(),
                description: "Deterministic agent for integration testing".to_string(),
                version: VERSION.to_string(),
                capabilities: vec!["testing".to_string()],
            },
        }
    }
}

/// All registered agent types, in dispatch-table order.
pub fn catalog() -> Vec<AgentInfo> {
    AgentKind::ALL.iter().map(AgentKind::info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_catalog_covers_every_kind() {
        let infos = catalog();
        assert_eq!(infos.len(), AgentKind::ALL.len());
        for info in infos {
            // Every listed agent_type must resolve through the dispatch table.
            assert!(AgentKind::from_str(&info.agent_type).is_ok());
            assert!(!info.capabilities.is_empty());
        }
    }
}
