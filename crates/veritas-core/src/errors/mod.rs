mod consistency_error;
mod engine_error;
mod learning_error;
mod veritas_error;

pub use consistency_error::ConsistencyError;
pub use engine_error::EngineError;
pub use learning_error::LearningError;
pub use veritas_error::{VeritasError, VeritasResult};
