use crate::errors::EngineError;
use crate::models::{EngineOutput, EngineRole, EngineTier, FeatureSet};

/// An external verdict engine: visual-integrity assessor or extraction assistant.
///
/// `assess` is a blocking call. The orchestrator runs it off the async runtime and
/// abandons it when its timeout elapses; no cancellation signal reaches the engine.
pub trait IVerdictEngine: Send + Sync {
    /// Stable engine name; keys timeout overrides and audit evidence.
    fn name(&self) -> &str;

    fn tier(&self) -> EngineTier;

    fn role(&self) -> EngineRole;

    fn assess(&self, features: &FeatureSet) -> Result<EngineOutput, EngineError>;
}
