//! Error types for the check engine.

/// Errors that can occur while resolving checks.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A roll was executed twice, or executed without the identity it needs.
    #[error("invalid roll state: {0}")]
    InvalidRollState(String),

    /// A difficulty rating name is not in the rule tables.
    #[error("unknown difficulty rating: {0}")]
    UnknownDifficulty(String),

    /// The rule tables or a check definition are malformed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A rule table document could not be parsed.
    #[error("invalid tables document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience result type for check operations.
pub type MechResult<T> = Result<T, MechError>;
