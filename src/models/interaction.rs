use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One completed request: what the user said, the intent it became, and what happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_input: String,
    pub agent_response: Value,
    pub command_result: Value,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    pub fn new(user_input: impl Into<String>, agent_response: Value, command_result: Value) -> Self {
        Self {
            user_input: user_input.into(),
            agent_response,
            command_result,
            timestamp: Utc::now(),
        }
    }

    /// Error text of the stored result, if the request failed at the top level
    pub fn error(&self) -> Option<String> {
        match self.command_result.get("error")? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
