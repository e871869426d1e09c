//! Append-only audit trail: the compliance record of every analysis.

mod event;
mod reconciliation;
mod trail;

pub use event::{AuditCategory, AuditEvent, AuditSource};
pub use reconciliation::{ReconciliationEvent, ReconciliationInputs, VerdictInput};
pub use trail::AuditTrail;
