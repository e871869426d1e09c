use super::{ConsistencyError, EngineError, LearningError};

/// Result alias used across the workspace.
pub type VeritasResult<T> = Result<T, VeritasError>;

/// Top-level error for the decision engine.
#[derive(Debug, thiserror::Error)]
pub enum VeritasError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("toml parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("rule {rule_id} faulted: {reason}")]
    RuleFault { rule_id: String, reason: String },

    #[error("invalid input field {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("engine error: {0}")]
    EngineError(#[from] EngineError),

    #[error("consistency violation: {0}")]
    ConsistencyError(#[from] ConsistencyError),

    #[error("learning error: {0}")]
    LearningError(#[from] LearningError),
}
