//! Request facade: prompt assembly for the intent parser, execution and history.
//!
//! The language-model parser itself lives outside this crate. [`Agent::build_prompt`]
//! produces the text it is sent, and [`Agent::handle_reply`] accepts whatever came
//! back, salvaging an intent from chatty or fenced replies with [`extract_intent`].

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::commands::CommandRegistry;
use crate::config::EngineConfig;
use crate::launcher::Launcher;
use crate::memory::MemoryStore;
use crate::workflow::WorkflowExecutor;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("code fence pattern is valid")
});

pub struct Agent {
    memory: Arc<MemoryStore>,
    executor: WorkflowExecutor,
}

impl Agent {
    pub fn new(config: EngineConfig, launcher: Arc<dyn Launcher>) -> Self {
        let memory = Arc::new(MemoryStore::new(&config));
        let registry = CommandRegistry::new(config, memory.clone(), launcher);
        Self { memory, executor: WorkflowExecutor::new(registry) }
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    pub fn executor(&self) -> &WorkflowExecutor {
        &self.executor
    }

    /// Text sent to the intent parser: recent context, then the current request
    pub fn build_prompt(&self, user_input: &str, current_dir: &Path) -> String {
        format!(
            "{}\n\nCurrent Directory: '{}'\nUser: '{}'",
            self.memory.get_context(),
            current_dir.display(),
            user_input
        )
    }

    /// Execute an already-parsed intent and record the interaction
    ///
    /// Returns `{"agent_command": <intent>, "result": <result>}`.
    pub fn handle(&self, user_input: &str, intent: Value) -> Value {
        let execution = self.executor.execute(&intent);
        let result = execution.to_value();
        if let Some(error) = execution.error() {
            info!(error, "request failed");
        }

        self.memory.add_interaction(user_input, intent.clone(), result.clone());
        json!({ "agent_command": intent, "result": result })
    }

    /// Extract an intent from a raw parser reply, then [`handle`](Self::handle) it
    pub fn handle_reply(&self, user_input: &str, reply: &str) -> Value {
        self.handle(user_input, extract_intent(reply))
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

fn is_intent(value: &Value) -> bool {
    value.as_object().is_some_and(|o| o.contains_key("command") || o.contains_key("workflow"))
}

/// Byte ranges of top-level balanced `{...}` spans, skipping braces inside strings
fn object_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push((start, i + 1));
                }
            }
            _ => {}
        }
    }
    spans
}

/// Best-effort intent from a parser reply
///
/// 1. strip a surrounding Markdown code fence and parse the rest as JSON
/// 2. otherwise take the first balanced `{...}` that parses and names a
///    `command` or `workflow`
/// 3. otherwise answer conversationally with the raw text
pub fn extract_intent(reply: &str) -> Value {
    let body = strip_code_fence(reply);
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && value.is_object()
    {
        return value;
    }

    for (start, end) in object_spans(body) {
        if let Ok(value) = serde_json::from_str::<Value>(&body[start..end])
            && is_intent(&value)
        {
            debug!("recovered intent embedded in parser reply");
            return value;
        }
    }

    debug!("parser reply held no intent; answering conversationally");
    json!({ "command": "respond", "parameters": { "message": reply.trim() } })
}
