//! # veritas-observability
//!
//! Tracing setup with span definitions and structured log events, decision
//! metrics, and engine degradation tracking with alerting.
//!
//! Audit events stay the compliance record of an analysis; everything here is
//! operational telemetry.

pub mod degradation;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::{evaluate_alerts, AlertLevel, DegradationAlert, DegradationTracker, EngineDegradation};
pub use metrics::DecisionMetrics;
