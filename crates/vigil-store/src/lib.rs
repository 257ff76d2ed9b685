//! Persistence layer for alerts, destinations, and escalation history.
//!
//! One SQLite database holds three tables: `alerts` (append-only),
//! `destinations`, and `escalation_history` (append-only). Each insert runs
//! as its own short transaction so identifiers stay monotonic across
//! concurrent workers, and `record` returns the row it just inserted via
//! `RETURNING` rather than a separate highest-id query.
//!
//! The store is constructed with an optional [`Escalator`] collaborator and
//! invokes it synchronously after a successful insert; collaborator
//! failures are logged and never unwind the committed row.

pub mod destinations;
pub mod error;
pub mod metrics;
pub mod store;


pub use error::{StoreError, StoreResult};
pub use store::AlertStore;

use async_trait::async_trait;
use vigil_models::AlertRecord;

/// Collaborator notified after every successfully stored alert.
///
/// Implemented by the escalation router; the trait lives here so the store
/// can be constructed with the collaborator injected explicitly instead of
/// discovering it at call time.
#[async_trait]
pub trait Escalator: Send + Sync {
    /// React to a newly committed alert. Errors are logged by the store and
    /// never propagate to the caller of `record`.
    async fn alert_recorded(
        &self,
        alert: &AlertRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
