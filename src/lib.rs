//! Filewise - Execute file-system intents with a semantic search fallback
//!
//! This library runs structured intents (one command, or an ordered workflow of
//! commands) produced by an external language-model parser against the local file
//! system. It provides:
//!
//! - A command registry with typed parameters and alias normalization
//! - A fail-soft workflow executor that reports one result per step
//! - A keyword search over directory trees that falls back to fuzzy matches
//!   against previously seen files
//! - A thread-safe memory store holding conversation history and cached searches
//! - Program commands (close, list, host facts) behind a mockable process table
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use filewise::{Agent, EngineConfig, SystemLauncher};
//! use serde_json::json;
//!
//! let agent = Agent::new(EngineConfig::default(), Arc::new(SystemLauncher));
//! let response = agent.handle(
//!     "find my resume",
//!     json!({ "command": "search_item", "parameters": { "keyword": "resume", "search_path": "~" } }),
//! );
//! println!("{}", response["result"]);
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod launcher;
pub mod memory;
pub mod models;
pub mod search;
pub mod similarity;
pub mod system;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use agent::{Agent, extract_intent};
pub use commands::{Command, CommandRegistry};
pub use config::EngineConfig;
pub use error::{CommandError, ErrorKind};
pub use launcher::{Launcher, RecordingLauncher, SystemLauncher};
pub use memory::MemoryStore;
pub use models::{CommandResult, Execution, Outcome, SearchReport, SearchType};
pub use search::{CancelToken, SearchEngine, SearchRequest};
pub use similarity::{similarity, text_similarity, tokenize};
pub use system::{ProcessTable, StaticProcessTable, SystemProcessTable};
pub use workflow::WorkflowExecutor;
