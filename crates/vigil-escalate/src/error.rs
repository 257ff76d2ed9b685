//! Escalation error types.

use thiserror::Error;

/// Result type for escalation operations.
pub type EscalateResult<T> = Result<T, EscalateError>;

/// Errors raised while routing an alert.
///
/// These never reach the detection pipeline: the alert store catches and
/// logs them at its collaborator call site.
#[derive(Debug, Error)]
pub enum EscalateError {
    #[error("Store error during escalation: {0}")]
    Store(#[from] vigil_store::StoreError),
}
