//! The escalation router.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use vigil_models::{
    AlertRecord, ConfidenceTier, Destination, EmergencyService, NewDestination,
};
use vigil_store::{AlertStore, Escalator};

use crate::error::EscalateResult;
use crate::transport::NotificationTransport;

/// Routes stored alerts to location-specific destinations.
///
/// Holds its own handle to the shared store; the alert store is constructed
/// with this router injected as its [`Escalator`] collaborator.
pub struct EscalationRouter {
    store: AlertStore,
    transport: Arc<dyn NotificationTransport>,
}

impl EscalationRouter {
    pub fn new(store: AlertStore, transport: Arc<dyn NotificationTransport>) -> Self {
        Self { store, transport }
    }

    /// Evaluate one stored alert.
    ///
    /// Trigger condition: escalatable threat class, confidence at the
    /// critical tier or above, and a non-empty location. Anything else is a
    /// no-op: no lookups, no rows.
    pub async fn handle(&self, alert: &AlertRecord) -> EscalateResult<()> {
        let Some(location) = alert.location_trimmed() else {
            debug!(alert_id = alert.id, "no location; skipping escalation");
            return Ok(());
        };
        if !alert.threat.is_escalatable() || alert.tier() < ConfidenceTier::Critical {
            debug!(
                alert_id = alert.id,
                threat = %alert.threat,
                confidence = alert.confidence,
                "below escalation gate"
            );
            return Ok(());
        }

        // Emergency tier: make sure the responsible service exists for this
        // location before fanning out. Aggression has no service mapping.
        let mut emergency: Option<Destination> = None;
        if alert.tier() == ConfidenceTier::Emergency {
            if let Some(service) = EmergencyService::for_threat(alert.threat) {
                emergency = Some(self.ensure_emergency_destination(location, service).await?);
            }
        }

        let destinations = self.store.active_destinations_for(location).await?;
        if destinations.is_empty() {
            // No configured recipients. A service provisioned above still
            // gets its audit row, referencing this alert.
            if let Some(dest) = emergency {
                self.dispatch(alert, &dest, location).await?;
            } else {
                info!(alert_id = alert.id, location, "no destinations configured");
            }
            return Ok(());
        }

        for dest in &destinations {
            self.dispatch(alert, dest, location).await?;
        }
        Ok(())
    }

    /// Idempotent lookup-before-insert provisioning: repeated emergency
    /// alerts for the same location never create duplicate rows.
    async fn ensure_emergency_destination(
        &self,
        location: &str,
        service: EmergencyService,
    ) -> EscalateResult<Destination> {
        if let Some(existing) = self
            .store
            .find_emergency_destination(location, service.name_pattern())
            .await?
        {
            debug!(
                destination = %existing.name,
                location,
                "emergency service already provisioned"
            );
            return Ok(existing);
        }

        let (email, phone) = service.default_contacts();
        let created = self
            .store
            .insert_destination(
                &NewDestination::new(location, service.destination_name(location))
                    .with_contacts(Some(email), Some(phone)),
            )
            .await?;
        info!(destination = %created.name, location, "provisioned emergency service");
        Ok(created)
    }

    /// Write the audit row, then hand the summary to the transport.
    /// Delivery failures are logged per destination and never abort the
    /// fan-out.
    async fn dispatch(
        &self,
        alert: &AlertRecord,
        destination: &Destination,
        location: &str,
    ) -> EscalateResult<()> {
        self.store
            .insert_escalation(alert.id, destination.id, location, alert.threat)
            .await?;

        if let Err(e) = self.transport.deliver(destination, &alert.summary()).await {
            warn!(
                destination = %destination.name,
                transport = self.transport.name(),
                error = %e,
                "notification delivery failed"
            );
        }

        info!(
            alert_id = alert.id,
            destination = %destination.name,
            threat = %alert.threat,
            location,
            "escalation sent"
        );
        Ok(())
    }
}

#[async_trait]
impl Escalator for EscalationRouter {
    async fn alert_recorded(
        &self,
        alert: &AlertRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.handle(alert).await.map_err(|e| Box::new(e) as _)
    }
}
