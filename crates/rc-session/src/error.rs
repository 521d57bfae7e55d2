//! Error types for check sessions.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while running a check.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No entity with this name or alias.
    #[error("no one named '{0}' is here")]
    UnknownEntity(String),

    /// The entity exists but cannot act in this role.
    #[error("{0}")]
    WrongKind(String),

    /// No defined check with this name.
    #[error("no check named '{0}'")]
    UnknownCheck(String),

    /// The request is malformed.
    #[error("{0}")]
    InvalidRequest(String),

    /// Roll or table error.
    #[error(transparent)]
    Mechanics(#[from] rc_mechanics::MechError),

    /// Roster error.
    #[error(transparent)]
    Core(#[from] rc_core::CoreError),

    /// A check definition document could not be parsed.
    #[error("invalid checks document: {0}")]
    Parse(#[from] serde_json::Error),
}
