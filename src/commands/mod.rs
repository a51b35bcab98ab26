//! Typed commands and the normalization boundary in front of them.
//!
//! Intents arrive as loose JSON (`{"command": ..., "parameters": {...}}`) from a
//! language-model parser that does not always use consistent names. Everything loose
//! is resolved here, once, before dispatch:
//!
//! - parameter aliases `file_path` and `folder_path` become `path` (when `path` is absent)
//! - command alias `execute_file` becomes `execute_code`
//! - the name selects a [`Command`] variant and the mapping decodes into its
//!   parameter struct
//!
//! An unknown name is a handler-level failure (`Unsupported`, fail-soft). Parameters
//! that cannot be decoded are a `DispatchFailure`, which the executor reports as
//! `Execution error: ...`.

pub mod handlers;
pub mod registry;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::CommandError;
use crate::models::RawCommand;
pub use registry::CommandRegistry;

const PATH_ALIASES: &[&str] = &["file_path", "folder_path"];

/// Every command name the registry accepts, aliases included
pub const COMMAND_NAMES: &[&str] = &[
    "list_directory",
    "create_directory",
    "create_file",
    "write_file",
    "read_file",
    "open_file",
    "open_folder",
    "move_item",
    "copy_item",
    "delete_file",
    "delete_directory",
    "search_item",
    "execute_code",
    "execute_file",
    "open_application",
    "browse_internet",
    "get_current_time",
    "close_program",
    "list_running_programs",
    "get_system_info",
    "clarify",
    "respond",
];

/// Rewrite parameter aliases in place
pub fn normalize_parameters(parameters: &mut Map<String, Value>) {
    for alias in PATH_ALIASES {
        if !parameters.contains_key("path")
            && let Some(value) = parameters.remove(*alias)
        {
            parameters.insert("path".to_string(), value);
        }
    }
}

/// Canonical command name after alias resolution
pub fn canonical_name(name: &str) -> &str {
    match name {
        "execute_file" => "execute_code",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionalPath {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequiredPath {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateDirectoryParams {
    pub path: String,
    #[serde(default = "default_true")]
    pub exist_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WriteParams {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub open_after: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenFileParams {
    pub path: String,
    #[serde(default)]
    pub application: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransferParams {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub search_path: Option<String>,
    /// Accepted when the parser says `path` instead of `search_path`
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub search_type: Option<String>,
    #[serde(default)]
    pub use_semantic: Option<bool>,
    #[serde(default)]
    pub semantic_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecuteParams {
    pub path: String,
    /// Informational; the extension decides the interpreter
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationParams {
    pub application: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CloseProgramParams {
    #[serde(default)]
    pub program_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClarifyParams {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RespondParams {
    pub message: String,
}

fn default_true() -> bool {
    true
}

/// One decoded command, ready for a handler
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ListDirectory(OptionalPath),
    CreateDirectory(CreateDirectoryParams),
    CreateFile(WriteParams),
    WriteFile(WriteParams),
    ReadFile(RequiredPath),
    OpenFile(OpenFileParams),
    OpenFolder(RequiredPath),
    MoveItem(TransferParams),
    CopyItem(TransferParams),
    DeleteFile(RequiredPath),
    DeleteDirectory(RequiredPath),
    SearchItem(SearchParams),
    ExecuteCode(ExecuteParams),
    OpenApplication(ApplicationParams),
    BrowseInternet(BrowseParams),
    GetCurrentTime,
    CloseProgram(CloseProgramParams),
    ListRunningPrograms,
    GetSystemInfo,
    Clarify(ClarifyParams),
    Respond(RespondParams),
}

fn decode<T: DeserializeOwned>(name: &str, parameters: &Map<String, Value>) -> Result<T, CommandError> {
    serde_json::from_value(Value::Object(parameters.clone()))
        .map_err(|e| CommandError::dispatch(format!("invalid parameters for '{}': {}", name, e)))
}

/// Why a raw command could not become a [`Command`]
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Handler-level, reported as the step's result
    Rejected(CommandError),
    /// Orchestration-level, reported by the executor
    Dispatch(CommandError),
}

impl Command {
    /// Decode an already-normalized raw command
    pub fn from_raw(raw: &RawCommand) -> Result<Self, DecodeError> {
        let Some(name) = raw.command.as_deref() else {
            return Err(DecodeError::Rejected(CommandError::malformed(
                "Malformed intent: command name is missing",
            )));
        };
        let params = &raw.parameters;
        let name = canonical_name(name);

        let command = match name {
            "list_directory" => decode(name, params).map(Command::ListDirectory),
            "create_directory" => decode(name, params).map(Command::CreateDirectory),
            "create_file" => decode(name, params).map(Command::CreateFile),
            "write_file" => decode(name, params).map(Command::WriteFile),
            "read_file" => decode(name, params).map(Command::ReadFile),
            "open_file" => decode(name, params).map(Command::OpenFile),
            "open_folder" => decode(name, params).map(Command::OpenFolder),
            "move_item" => decode(name, params).map(Command::MoveItem),
            "copy_item" => decode(name, params).map(Command::CopyItem),
            "delete_file" => decode(name, params).map(Command::DeleteFile),
            "delete_directory" => decode(name, params).map(Command::DeleteDirectory),
            "search_item" => decode(name, params).map(Command::SearchItem),
            "execute_code" => decode(name, params).map(Command::ExecuteCode),
            "open_application" => decode(name, params).map(Command::OpenApplication),
            "browse_internet" => decode(name, params).map(Command::BrowseInternet),
            "get_current_time" => Ok(Command::GetCurrentTime),
            "close_program" => decode(name, params).map(Command::CloseProgram),
            "list_running_programs" => Ok(Command::ListRunningPrograms),
            "get_system_info" => Ok(Command::GetSystemInfo),
            "clarify" => decode(name, params).map(Command::Clarify),
            "respond" => decode(name, params).map(Command::Respond),
            unknown => {
                return Err(DecodeError::Rejected(CommandError::unsupported(format!(
                    "Unknown command '{}'",
                    unknown
                ))));
            }
        };
        command.map_err(DecodeError::Dispatch)
    }
}
