//! Escalation routing.
//!
//! Evaluated once per successfully stored alert: gate on threat class,
//! confidence tier, and location; auto-provision emergency-service
//! destinations at the emergency tier (idempotently); write one
//! [`vigil_models::EscalationRecord`] per active destination; and hand each
//! one to the pluggable notification transport. Every failure in here is
//! isolated; a committed alert is never invalidated by its escalation.

pub mod error;
pub mod router;
pub mod transport;

#[cfg(test)]
mod tests;

pub use error::{EscalateError, EscalateResult};
pub use router::EscalationRouter;
pub use transport::{LogTransport, NotificationTransport, TransportError};
