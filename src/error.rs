//! Error taxonomy for command execution.
//!
//! # Error Handling Strategy
//!
//! Every handler is **fail-soft**: a failure is returned as data, never raised past
//! the handler boundary. A workflow therefore keeps running after a bad step, and
//! every response has the same shape (`{"error": ...}` or a success payload).
//!
//! - [`CommandError`] carries an [`ErrorKind`] so callers can match exhaustively
//!   instead of string-sniffing messages.
//! - `Display` renders only the message, which is what ends up in the serialized
//!   `{"error": "<message>"}` payload.
//! - Collaborators (launcher, process spawn) return `anyhow::Result`; the handler
//!   layer converts those into [`ErrorKind::Io`] via `From<anyhow::Error>`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Path missing
    NotFound,
    /// Copy or create destination collision
    AlreadyExists,
    /// Unknown command, search type or file type
    Unsupported,
    /// Intent object missing required fields
    MalformedIntent,
    /// Parameters a handler cannot accept
    DispatchFailure,
    /// Search walk hit its deadline or was cancelled
    Interrupted,
    /// Any other collaborator failure
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedIntent, message)
    }

    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DispatchFailure, message)
    }

    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Interrupted, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    /// Map a std I/O error, promoting the kinds the taxonomy names
    pub fn from_io(err: &std::io::Error, message: impl Into<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
            _ => ErrorKind::Io,
        };
        Self::new(kind, message)
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain on one line
        Self::io(format!("{:#}", err))
    }
}
