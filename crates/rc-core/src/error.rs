use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying a roster.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity ID does not exist in the roster.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity or room with the same name (or alias) already exists.
    #[error("name already taken: \"{0}\"")]
    DuplicateName(String),

    /// A named room reference could not be resolved.
    #[error("unknown room: \"{0}\"")]
    UnknownRoom(String),

    /// The roster document could not be parsed.
    #[error("invalid roster: {0}")]
    InvalidRoster(#[from] serde_json::Error),
}
