use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::search::SearchReport;
use super::system::{ProgramTable, SystemReport};
use crate::error::CommandError;

/// Success payload of a handler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Message { message: String },
    Listing { directory: String, contents: Vec<String> },
    FileContent { path: String, content: String },
    Search(SearchReport),
    Browse { message: String, url: String },
    Time { time: String, date: String, day: String, timezone: String },
    Programs { running_programs: ProgramTable },
    System(SystemReport),
    Clarify { clarify: String },
    Response { response: String },
}

impl Outcome {
    pub fn message(text: impl Into<String>) -> Self {
        Outcome::Message { message: text.into() }
    }
}

/// Either a success payload or an error payload, never both
pub type CommandResult = Result<Outcome, CommandError>;

/// Render a result the way every caller sees it: the outcome object, or `{"error": ...}`
pub fn result_to_value(result: &CommandResult) -> Value {
    match result {
        Ok(outcome) => serde_json::to_value(outcome).unwrap_or_else(|e| json!({ "error": e.to_string() })),
        Err(err) => json!({ "error": err.message }),
    }
}

fn serialize_result<S: Serializer>(result: &CommandResult, serializer: S) -> Result<S::Ok, S::Error> {
    result_to_value(result).serialize(serializer)
}

/// A command as received, after parameter alias normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl RawCommand {
    pub fn new(command: impl Into<String>, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { command: Some(command.into()), parameters }
    }

    pub fn name(&self) -> &str {
        self.command.as_deref().unwrap_or("")
    }

    /// Compact JSON rendering of the parameters, used in summaries
    pub fn params_display(&self) -> String {
        serde_json::to_string(&self.parameters).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Outcome of one workflow step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub command: RawCommand,
    #[serde(serialize_with = "serialize_result")]
    pub result: CommandResult,
    pub summary: String,
}

impl StepResult {
    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }
}

/// What the workflow executor hands back for one intent
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    /// Bare command: its result, unwrapped
    Single(CommandResult),
    /// One entry per requested step, in order
    Workflow(Vec<StepResult>),
    /// Orchestration-level failure, not attributable to a single handler
    Failed(CommandError),
}

impl Execution {
    /// Top-level error text, if the whole response is an error
    pub fn error(&self) -> Option<&str> {
        match self {
            Execution::Single(Err(err)) | Execution::Failed(err) => Some(err.message.as_str()),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| json!({ "error": e.to_string() }))
    }
}

impl Serialize for Execution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Execution::Single(result) => serialize_result(result, serializer),
            Execution::Workflow(steps) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("workflow", steps)?;
                map.end()
            }
            Execution::Failed(err) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &err.message)?;
                map.end()
            }
        }
    }
}
