//! Runs an intent (one command or an ordered workflow) through the registry.
//!
//! Steps execute sequentially in the order given; a later step may depend on the
//! filesystem effects of an earlier one. A failing step is recorded and the next
//! step still runs. Nothing is rolled back.
//!
//! A [`ErrorKind::DispatchFailure`](crate::error::ErrorKind::DispatchFailure)
//! (parameters no handler accepts) reads `Execution error: ...`. For a bare command
//! it becomes the top-level `{"error": ...}`; inside a workflow it is that step's
//! result and the remaining steps still run.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::commands::{CommandRegistry, normalize_parameters};
use crate::error::CommandError;
use crate::models::{CommandResult, Execution, RawCommand, StepResult};

pub struct WorkflowExecutor {
    registry: CommandRegistry,
}

/// Build the raw command for one intent object, tolerating missing pieces
fn raw_command(value: &Value) -> RawCommand {
    let Some(object) = value.as_object() else {
        return RawCommand::default();
    };
    let command = object.get("command").and_then(Value::as_str).map(str::to_string);
    let mut parameters = match object.get("parameters") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    normalize_parameters(&mut parameters);
    RawCommand { command, parameters }
}

fn summarize(raw: &RawCommand, result: &CommandResult) -> String {
    match result {
        Ok(_) => format!("{} executed with {}", raw.name(), raw.params_display()),
        Err(err) => format!("failed to {} with {}: {}", raw.name(), raw.params_display(), err),
    }
}

fn execution_error(err: CommandError) -> CommandError {
    CommandError::new(err.kind, format!("Execution error: {}", err.message))
}

impl WorkflowExecutor {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn execute(&self, intent: &Value) -> Execution {
        let Some(object) = intent.as_object() else {
            return Execution::Failed(CommandError::malformed(
                "Malformed intent: expected a command object or a workflow",
            ));
        };

        match object.get("workflow") {
            Some(Value::Array(steps)) => self.run_workflow(steps),
            Some(_) => Execution::Failed(CommandError::malformed(
                "Malformed intent: 'workflow' must be a list of commands",
            )),
            None => self.run_single(intent),
        }
    }

    fn run_single(&self, intent: &Value) -> Execution {
        let raw = raw_command(intent);
        match self.registry.dispatch(&raw) {
            Ok(result) => {
                if let Err(err) = &result {
                    debug!(command = raw.name(), error = %err, "command failed");
                }
                Execution::Single(result)
            }
            Err(err) => {
                warn!(command = raw.name(), error = %err, "dispatch failed");
                Execution::Failed(execution_error(err))
            }
        }
    }

    fn run_workflow(&self, steps: &[Value]) -> Execution {
        let mut results = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            let raw = raw_command(step);
            let result = self.registry.dispatch(&raw).unwrap_or_else(|err| {
                warn!(step = index + 1, command = raw.name(), error = %err, "step dispatch failed");
                Err(execution_error(err))
            });

            let summary = summarize(&raw, &result);
            debug!(step = index + 1, "{}", summary);
            results.push(StepResult { command: raw, result, summary });
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        info!(steps = results.len(), failed, "workflow finished");
        Execution::Workflow(results)
    }
}
