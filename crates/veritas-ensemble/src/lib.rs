//! # veritas-ensemble
//!
//! Merges the rule engine's [`Decision`](veritas_core::Decision) with external
//! engine verdicts: runs the engines on a bounded worker pool, normalizes what
//! they report, and reconciles everything through a fixed-precedence state machine.

pub mod normalize;
pub mod orchestrator;
pub mod reconciler;
pub mod verdict;

pub use normalize::{ConfidenceNormalizer, Normalized, NormalizationSource};
pub use orchestrator::{EngineOrchestrator, EngineRun};
pub use reconciler::{EnsembleReconciler, Reconciliation};
pub use verdict::{corroborate_extraction, to_verdict, verdicts_from_runs, NormalizedVerdict};
