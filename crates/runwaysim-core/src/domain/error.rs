//! Domain-level error taxonomy for runwaysim.

/// Input rejected before a simulation starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("module list must not be empty")]
    EmptyModules,

    #[error("team must not be empty")]
    EmptyTeam,

    #[error("trial count must be positive")]
    ZeroTrials,

    #[error("deadline must be positive")]
    NonPositiveDeadline,

    #[error("runway must be positive")]
    NonPositiveRunway,

    #[error("duplicate module id: {id}")]
    DuplicateModuleId { id: String },

    #[error("module id must not be empty")]
    EmptyModuleId,
}

/// runwaysim errors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid simulation input: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runwaysim operations.
pub type Result<T> = std::result::Result<T, SimError>;
