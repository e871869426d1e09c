/// External verdict engine errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("engine {engine} unavailable: {reason}")]
    Unavailable { engine: String, reason: String },

    #[error("engine {engine} timed out after {timeout_ms}ms")]
    TimedOut { engine: String, timeout_ms: u64 },

    #[error("engine {engine} returned malformed output: {reason}")]
    Malformed { engine: String, reason: String },

    #[error("worker pool error: {reason}")]
    WorkerPool { reason: String },
}

impl EngineError {
    /// Name of the engine the error belongs to, if any.
    pub fn engine(&self) -> Option<&str> {
        match self {
            Self::Unavailable { engine, .. }
            | Self::TimedOut { engine, .. }
            | Self::Malformed { engine, .. } => Some(engine),
            Self::WorkerPool { .. } => None,
        }
    }
}
