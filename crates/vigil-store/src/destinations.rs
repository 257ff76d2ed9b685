//! Destination and escalation-history operations.
//!
//! Destinations may be deactivated but alert and history rows are
//! append-only: nothing here updates them.

use chrono::Utc;
use validator::Validate;

use vigil_models::{Destination, EscalationRecord, NewDestination, ThreatClass, STATUS_SENT};

use crate::error::{StoreError, StoreResult};
use crate::metrics::{record_destination, record_escalation};
use crate::store::{parse_timestamp, AlertStore};

#[derive(Debug, sqlx::FromRow)]
struct DestinationRow {
    id: i64,
    location: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    active: i64,
    created_at: String,
}

impl DestinationRow {
    fn into_destination(self) -> StoreResult<Destination> {
        Ok(Destination {
            id: self.id,
            location: self.location,
            name: self.name,
            email: self.email,
            phone: self.phone,
            active: self.active != 0,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EscalationRow {
    id: i64,
    alert_id: i64,
    destination_id: i64,
    location: String,
    threat: String,
    sent_at: String,
    status: String,
}

impl EscalationRow {
    fn into_record(self) -> StoreResult<EscalationRecord> {
        Ok(EscalationRecord {
            id: self.id,
            alert_id: self.alert_id,
            destination_id: self.destination_id,
            location: self.location,
            threat: self
                .threat
                .parse::<ThreatClass>()
                .map_err(|e| StoreError::corrupt(e.to_string()))?,
            sent_at: parse_timestamp(&self.sent_at)?,
            status: self.status,
        })
    }
}

impl AlertStore {
    /// Insert a destination after validating its contact channels.
    pub async fn insert_destination(&self, new: &NewDestination) -> StoreResult<Destination> {
        new.validate()
            .map_err(|e| StoreError::invalid_input(e.to_string()))?;

        let row: DestinationRow = sqlx::query_as(
            r#"
            INSERT INTO destinations (location, name, email, phone, active, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            RETURNING id, location, name, email, phone, active, created_at
            "#,
        )
        .bind(&new.location)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(self.pool())
        .await?;

        record_destination();
        row.into_destination()
    }

    /// Active destinations configured for a location.
    pub async fn active_destinations_for(&self, location: &str) -> StoreResult<Vec<Destination>> {
        let rows: Vec<DestinationRow> = sqlx::query_as(
            "SELECT id, location, name, email, phone, active, created_at
             FROM destinations WHERE location = ? AND active = 1
             ORDER BY name",
        )
        .bind(location)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(DestinationRow::into_destination).collect()
    }

    /// Look up an auto-provisioned emergency destination by location and a
    /// case-insensitive name pattern. This lookup-before-insert is what
    /// keeps provisioning idempotent.
    pub async fn find_emergency_destination(
        &self,
        location: &str,
        name_pattern: &str,
    ) -> StoreResult<Option<Destination>> {
        let row: Option<DestinationRow> = sqlx::query_as(
            "SELECT id, location, name, email, phone, active, created_at
             FROM destinations
             WHERE location = ? AND active = 1 AND LOWER(name) LIKE ?
             LIMIT 1",
        )
        .bind(location)
        .bind(format!("%{}%", name_pattern.to_lowercase()))
        .fetch_optional(self.pool())
        .await?;
        row.map(DestinationRow::into_destination).transpose()
    }

    /// Flip a destination's active flag. Returns false when the id is
    /// unknown.
    pub async fn set_destination_active(&self, id: i64, active: bool) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE destinations SET active = ? WHERE id = ?")
            .bind(active as i64)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All destinations, for administration views.
    pub async fn list_destinations(&self) -> StoreResult<Vec<Destination>> {
        let rows: Vec<DestinationRow> = sqlx::query_as(
            "SELECT id, location, name, email, phone, active, created_at
             FROM destinations ORDER BY location, name",
        )
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(DestinationRow::into_destination).collect()
    }

    /// Append one escalation audit row with status "sent".
    pub async fn insert_escalation(
        &self,
        alert_id: i64,
        destination_id: i64,
        location: &str,
        threat: ThreatClass,
    ) -> StoreResult<EscalationRecord> {
        let row: EscalationRow = sqlx::query_as(
            r#"
            INSERT INTO escalation_history (alert_id, destination_id, location, threat, sent_at, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, alert_id, destination_id, location, threat, sent_at, status
            "#,
        )
        .bind(alert_id)
        .bind(destination_id)
        .bind(location)
        .bind(threat.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(STATUS_SENT)
        .fetch_one(self.pool())
        .await?;

        record_escalation();
        row.into_record()
    }

    /// Escalations written for one alert.
    pub async fn escalations_for_alert(&self, alert_id: i64) -> StoreResult<Vec<EscalationRecord>> {
        let rows: Vec<EscalationRow> = sqlx::query_as(
            "SELECT id, alert_id, destination_id, location, threat, sent_at, status
             FROM escalation_history WHERE alert_id = ? ORDER BY id",
        )
        .bind(alert_id)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(EscalationRow::into_record).collect()
    }

    /// Most recent escalations, newest first.
    pub async fn recent_escalations(&self, limit: i64) -> StoreResult<Vec<EscalationRecord>> {
        let rows: Vec<EscalationRow> = sqlx::query_as(
            "SELECT id, alert_id, destination_id, location, threat, sent_at, status
             FROM escalation_history ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(EscalationRow::into_record).collect()
    }
}
