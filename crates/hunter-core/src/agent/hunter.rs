//! Sales Hunter agent: gathers business leads for a search phrase around a
//! location.
//!
//! The two data sources are placeholders standing in for Google Places and
//! a web-search integration; they sit behind awaited delays so the
//! cancellation and timeout paths behave like real I/O. Swapping in real
//! integrations replaces the two private source methods and nothing else.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use hunter_state::{AgentResult, TaskConfig};

use crate::agent::cancel::CancelSignal;
use crate::agent::contract::Agent;
use crate::agent::error::AgentError;

const DEFAULT_RADIUS_M: u64 = 5_000;
const DEFAULT_MAX_RESULTS: u64 = 20;
const SOURCE_DELAY_MS: u64 = 500;

pub struct SalesHunterAgent {
    agent_id: String,
}

impl SalesHunterAgent {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
        }
    }

    /// Simulated maps lookup. Placeholder for a Places API integration.
    async fn search_maps(
        &self,
        search_phrase: &str,
        location: &str,
        max_results: u64,
    ) -> Result<Vec<Value>, AgentError> {
        tokio::time::sleep(std::time::Duration::from_millis(SOURCE_DELAY_MS)).await;

        let count = (max_results / 2).min(10);
        let leads = (0..count)
            .map(|i| {
                json!({
                    "source": "maps",
                    "name": format!("Business {i}"),
                    "address": format!("{location} - Location {i}"),
                    "phone": format!("+1-555-000-{i:04}"),
                    "rating": 4.0 + (i % 10) as f64 / 10.0,
                    "category": search_phrase,
                    "website": format!("https://business{i}.example.com"),
                    "found_at": Utc::now().to_rfc3339(),
                })
            })
            .collect();
        Ok(leads)
    }

    /// Simulated web search. Placeholder for a search API integration.
    async fn search_web(
        &self,
        search_phrase: &str,
        location: &str,
        max_results: u64,
    ) -> Result<Vec<Value>, AgentError> {
        tokio::time::sleep(std::time::Duration::from_millis(SOURCE_DELAY_MS)).await;

        let count = (max_results / 2).min(10);
        let leads = (0..count)
            .map(|i| {
                json!({
                    "source": "web_search",
                    "name": format!("Online Business {i}"),
                    "address": format!("{location} - Web {i}"),
                    "email": format!("contact{i}@business.example.com"),
                    "category": search_phrase,
                    "website": format!("https://webbusiness{i}.example.com"),
                    "found_at": Utc::now().to_rfc3339(),
                })
            })
            .collect();
        Ok(leads)
    }

    /// Drop leads that share a lowercase (name, address) key.
    fn deduplicate(leads: Vec<Value>) -> Vec<Value> {
        let mut seen = HashSet::new();
        leads
            .into_iter()
            .filter(|lead| {
                let key = format!(
                    "{}:{}",
                    lead["name"].as_str().unwrap_or_default().to_lowercase(),
                    lead["address"].as_str().unwrap_or_default().to_lowercase(),
                );
                seen.insert(key)
            })
            .collect()
    }

    /// Attach a 0-100 quality score to each lead.
    fn enrich(leads: &mut [Value]) {
        for lead in leads.iter_mut() {
            let score = Self::lead_score(lead);
            if let Some(map) = lead.as_object_mut() {
                map.insert("enriched".into(), json!(true));
                map.insert("lead_score".into(), json!(score));
            }
        }
    }

    fn lead_score(lead: &Value) -> u64 {
        let mut score: u64 = 50;
        if lead.get("phone").map_or(false, |v| !v.is_null()) {
            score += 10;
        }
        if lead.get("email").map_or(false, |v| !v.is_null()) {
            score += 10;
        }
        if lead.get("website").map_or(false, |v| !v.is_null()) {
            score += 10;
        }
        if let Some(rating) = lead.get("rating").and_then(Value::as_f64) {
            if rating >= 4.5 {
                score += 15;
            } else if rating >= 4.0 {
                score += 10;
            }
        }
        score.min(100)
    }
}

fn non_empty_str<'a>(config: &'a TaskConfig, field: &str) -> Option<&'a str> {
    config
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl Agent for SalesHunterAgent {
    /// Required fields: `search_phrase` and `location`, both non-empty
    /// strings. `radius` and `max_results` are optional.
    fn validate(&self, config: &TaskConfig) -> bool {
        for field in ["search_phrase", "location"] {
            if non_empty_str(config, field).is_none() {
                debug!(agent_id = %self.agent_id, field, "missing or empty required field");
                return false;
            }
        }
        true
    }

    async fn execute(
        &self,
        config: &TaskConfig,
        cancel: &CancelSignal,
    ) -> Result<AgentResult, AgentError> {
        // validate() ran first; absent fields here would be an envelope bug,
        // so fall back to empty strings rather than panic.
        let search_phrase = non_empty_str(config, "search_phrase").unwrap_or_default();
        let location = non_empty_str(config, "location").unwrap_or_default();
        let radius = config
            .get("radius")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_RADIUS_M);
        let max_results = config
            .get("max_results")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        info!(
            agent_id = %self.agent_id,
            search_phrase,
            location,
            radius,
            "starting sales hunt"
        );

        let mut leads = self.search_maps(search_phrase, location, max_results).await?;
        debug!(agent_id = %self.agent_id, count = leads.len(), "maps source done");

        // Between sources is the cooperative bail-out point; the envelope's
        // select covers suspension inside a source.
        if !cancel.is_cancelled() {
            let web_leads = self.search_web(search_phrase, location, max_results).await?;
            debug!(agent_id = %self.agent_id, count = web_leads.len(), "web source done");
            leads.extend(web_leads);
        }

        let original_count = leads.len();
        let mut unique = Self::deduplicate(leads);
        let unique_count = unique.len();
        Self::enrich(&mut unique);

        let mut result = AgentResult::new(&self.agent_id, "sales_hunter");
        result.data.insert("leads".into(), Value::Array(unique));
        result.data.insert("total_found".into(), json!(unique_count));
        result.data.insert(
            "search_params".into(),
            json!({
                "search_phrase": search_phrase,
                "location": location,
                "radius": radius,
                "max_results": max_results,
            }),
        );
        result.metadata.insert(
            "sources_used".into(),
            json!(["maps", "web_search"]),
        );
        result.metadata.insert(
            "deduplication".into(),
            json!({
                "original_count": original_count,
                "unique_count": unique_count,
            }),
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::cancel::cancel_pair;

    fn config(search_phrase: &str, location: &str) -> TaskConfig {
        let mut map = TaskConfig::new();
        map.insert("search_phrase".into(), json!(search_phrase));
        map.insert("location".into(), json!(location));
        map
    }

    #[test]
    fn test_validate_requires_both_fields() {
        let agent = SalesHunterAgent::new("t1");
        assert!(agent.validate(&config("dentists", "Austin, TX")));

        let mut missing_location = TaskConfig::new();
        missing_location.insert("search_phrase".into(), json!("dentists"));
        assert!(!agent.validate(&missing_location));

        assert!(!agent.validate(&config("", "Austin, TX")));
        assert!(!agent.validate(&config("dentists", "   ")));
        assert!(!agent.validate(&TaskConfig::new()));
    }

    #[test]
    fn test_validate_rejects_non_string_fields() {
        let agent = SalesHunterAgent::new("t1");
        let mut map = TaskConfig::new();
        map.insert("search_phrase".into(), json!(42));
        map.insert("location".into(), json!("Austin, TX"));
        assert!(!agent.validate(&map));
    }

    #[test]
    fn test_lead_score_bounds() {
        let bare = json!({"name": "x"});
        assert_eq!(SalesHunterAgent::lead_score(&bare), 50);

        let full = json!({
            "phone": "+1", "email": "a@b.c", "website": "https://x", "rating": 4.9
        });
        assert_eq!(SalesHunterAgent::lead_score(&full), 95);

        let mid_rating = json!({"phone": "+1", "rating": 4.2});
        assert_eq!(SalesHunterAgent::lead_score(&mid_rating), 70);
    }

    #[test]
    fn test_deduplicate_keys_on_name_and_address() {
        let leads = vec![
            json!({"name": "Cafe A", "address": "1 Main St"}),
            json!({"name": "cafe a", "address": "1 MAIN st"}),
            json!({"name": "Cafe A", "address": "2 Main St"}),
        ];
        let unique = SalesHunterAgent::deduplicate(leads);
        assert_eq!(unique.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_populates_data_and_metadata() {
        let agent = SalesHunterAgent::new("t1");
        let (_handle, signal) = cancel_pair();

        let result = agent
            .execute(&config("dentists", "Austin, TX"), &signal)
            .await
            .unwrap();

        let leads = result.data["leads"].as_array().unwrap();
        assert!(!leads.is_empty());
        assert!(leads.iter().all(|l| l["enriched"] == json!(true)));
        assert_eq!(result.data["total_found"], json!(leads.len()));
        assert_eq!(
            result.data["search_params"]["radius"],
            json!(DEFAULT_RADIUS_M)
        );

        let dedup = &result.metadata["deduplication"];
        assert!(dedup["original_count"].as_u64().unwrap() >= dedup["unique_count"].as_u64().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_skips_second_source_when_cancelled() {
        let agent = SalesHunterAgent::new("t1");
        let (handle, signal) = cancel_pair();
        handle.cancel();

        // Called directly (no envelope select), the agent still honours the
        // cooperative check between sources.
        let result = agent
            .execute(&config("dentists", "Austin, TX"), &signal)
            .await
            .unwrap();

        let sources: Vec<&str> = result.data["leads"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|l| l["source"].as_str())
            .collect();
        assert!(sources.iter().all(|s| *s == "maps"));
    }
}
