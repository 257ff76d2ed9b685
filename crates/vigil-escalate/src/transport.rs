//! Notification transport boundary.
//!
//! Real delivery (email, SMS, dispatch) lives outside this system. The
//! router invokes the transport exactly where an escalation row is written;
//! the default implementation just logs the attempt.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use vigil_models::Destination;

/// Delivery failure reported by a transport.
#[derive(Debug, Error)]
#[error("Delivery failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Accepts (destination, alert summary) and attempts delivery out of band.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Attempt delivery of one alert summary to one destination.
    async fn deliver(&self, destination: &Destination, summary: &str)
        -> Result<(), TransportError>;

    /// Transport name for logging.
    fn name(&self) -> &'static str;
}

/// Stub transport that logs each attempt and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(
        &self,
        destination: &Destination,
        summary: &str,
    ) -> Result<(), TransportError> {
        info!(
            destination = %destination.name,
            email = destination.email.as_deref().unwrap_or("-"),
            phone = destination.phone.as_deref().unwrap_or("-"),
            "{summary}"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
