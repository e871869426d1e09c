//! # veritas-pipeline
//!
//! One entry point for an analysis: finalize the document profile, infer
//! geography, evaluate rules against the current learned snapshot, run the
//! external engines, reconcile, and hand back an [`AnalysisReport`].

pub mod pipeline;
pub mod report;
pub mod request;

pub use pipeline::DecisionPipeline;
pub use report::AnalysisReport;
pub use request::AnalysisRequest;
