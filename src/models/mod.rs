//! Data models shared by the search engine, memory store and executor.
//!
//! - [`Interaction`] - One completed request kept in conversation history
//! - [`FileInfo`] - Name parts of a found file, used for semantic matching
//! - [`SearchReport`] - Result of a `search_item` command
//! - [`RawCommand`], [`StepResult`], [`Execution`] - Intent input and executor output
//! - [`Outcome`] / [`CommandResult`] - Success payload or typed error, never both
//! - [`SystemReport`], [`ProgramTable`] - Host facts and running programs

pub mod interaction;
pub mod outcome;
pub mod search;
pub mod system;

pub use interaction::Interaction;
pub use outcome::{CommandResult, Execution, Outcome, RawCommand, StepResult, result_to_value};
pub use search::{FileInfo, SearchHits, SearchReport, SearchType, SemanticMatch};
pub use system::{DiskUsage, HostInfo, MemoryUsage, ProgramTable, ProgramUsage, SystemReport};
