//! Actions submitted to the world service

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// A uniquely identified, timestamped intent.
///
/// `id` is used by the server to deduplicate submissions, so every constructed
/// action gets a fresh v4 UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub agent_id: String,
    pub unit_id: String,
    pub payload: Map<String, Value>,
    /// Epoch milliseconds at construction
    pub created_at: i64,
}

impl Action {
    pub fn new(
        kind: impl Into<String>,
        agent_id: impl Into<String>,
        unit_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            agent_id: agent_id.into(),
            unit_id: unit_id.into(),
            payload: Map::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }
}

/// Service response to an action. Not interpreted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionResult(Value);

impl ActionResult {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let action = Action::new("gather", "agent-1", "u1");
        let value = serde_json::to_value(&action).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["agentId", "createdAt", "id", "payload", "type", "unitId"]
        );
        assert_eq!(value["type"], "gather");
        assert_eq!(value["payload"], json!({}));
        assert!(value["createdAt"].is_i64());
    }

    #[test]
    fn test_fresh_v4_ids() {
        let a = Action::new("gather", "agent-1", "u1");
        let b = Action::new("gather", "agent-1", "u1");

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.get_version_num(), 4);

        let text = serde_json::to_value(&a).unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(Uuid::parse_str(&text).unwrap(), a.id);
    }

    #[test]
    fn test_created_at_is_now() {
        let now = Utc::now().timestamp_millis();
        let action = Action::new("move", "agent-1", "u1");
        assert!((action.created_at - now).abs() <= 5_000);
    }

    #[test]
    fn test_result_display_is_compact_json() {
        let result: ActionResult = serde_json::from_str(r#"{ "status" : "ok" }"#).unwrap();
        assert_eq!(result.to_string(), r#"{"status":"ok"}"#);
    }
}
