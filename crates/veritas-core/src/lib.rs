//! # veritas-core
//!
//! Foundation crate for the Veritas document decision engine.
//! Defines the input and output models, the severity model, errors, config,
//! the append-only audit trail, and the traits external collaborators implement.
//! Every other crate in the workspace depends on this.

pub mod audit;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use audit::{AuditEvent, AuditTrail, ReconciliationEvent};
pub use config::VeritasConfig;
pub use errors::{VeritasError, VeritasResult};
pub use models::{
    Country, Decision, DocProfile, EngineVerdict, FeatureSet, GeoProfile, Label, RuleOutcome,
    Severity,
};
