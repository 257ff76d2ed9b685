//! The alert store: schema bootstrap, append-only inserts, and queries.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, error, info};

use vigil_models::{AlertRecord, BoundingBox, ConfidenceTier, Detection, ThreatClass};

use crate::error::{StoreError, StoreResult};
use crate::metrics::record_alert;
use crate::Escalator;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS alerts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    image_ref   TEXT NOT NULL,
    threat      TEXT NOT NULL,
    label       TEXT NOT NULL,
    confidence  REAL NOT NULL,
    x1          REAL,
    y1          REAL,
    x2          REAL,
    y2          REAL,
    location    TEXT
);

CREATE TABLE IF NOT EXISTS destinations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location    TEXT NOT NULL,
    name        TEXT NOT NULL,
    email       TEXT,
    phone       TEXT,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS escalation_history (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    alert_id        INTEGER,
    destination_id  INTEGER,
    location        TEXT NOT NULL,
    threat          TEXT NOT NULL,
    sent_at         TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'sent'
);
"#;

/// SQLite-backed store shared by the pipeline and the escalation router.
///
/// Cloning is cheap: clones share the connection pool and the injected
/// escalator.
#[derive(Clone)]
pub struct AlertStore {
    pool: SqlitePool,
    escalator: Option<Arc<dyn Escalator>>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AlertRow {
    pub id: i64,
    pub created_at: String,
    pub image_ref: String,
    pub threat: String,
    pub label: String,
    pub confidence: f64,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub location: Option<String>,
}

impl AlertRow {
    fn into_record(self) -> StoreResult<AlertRecord> {
        let bbox = match (self.x1, self.y1, self.x2, self.y2) {
            (Some(x1), Some(y1), Some(x2), Some(y2)) => Some(BoundingBox::new(x1, y1, x2, y2)),
            _ => None,
        };
        Ok(AlertRecord {
            id: self.id,
            created_at: parse_timestamp(&self.created_at)?,
            image_ref: self.image_ref,
            threat: self
                .threat
                .parse::<ThreatClass>()
                .map_err(|e| StoreError::corrupt(e.to_string()))?,
            label: self.label,
            confidence: self.confidence,
            bbox,
            location: self.location,
        })
    }
}

pub(crate) fn parse_timestamp(text: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(format!("bad timestamp {text:?}: {e}")))
}

impl AlertStore {
    /// Open (creating if missing) a database and bootstrap the schema.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Database)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self {
            pool,
            escalator: None,
        };
        store.init_schema().await?;
        info!(url, "alert store ready");
        Ok(store)
    }

    /// In-memory database for tests. A single connection keeps every query
    /// on the same memory store.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(StoreError::Database)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self {
            pool,
            escalator: None,
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Inject the escalation collaborator invoked after successful inserts.
    pub fn with_escalator(mut self, escalator: Arc<dyn Escalator>) -> Self {
        self.escalator = Some(escalator);
        self
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Persist one detection as an immutable alert row and return the row
    /// just inserted.
    ///
    /// The insert is its own short transaction; the returned record comes
    /// from `RETURNING` on this worker's statement, so concurrent writers
    /// can never hand escalation someone else's alert id. Store failures
    /// propagate to the caller.
    pub async fn record(
        &self,
        detection: &Detection,
        image_ref: &str,
        location: Option<&str>,
    ) -> StoreResult<AlertRecord> {
        let row: AlertRow = sqlx::query_as(
            r#"
            INSERT INTO alerts (created_at, image_ref, threat, label, confidence, x1, y1, x2, y2, location)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, created_at, image_ref, threat, label, confidence, x1, y1, x2, y2, location
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(image_ref)
        .bind(detection.threat.as_str())
        .bind(&detection.label)
        .bind(detection.confidence)
        .bind(detection.bbox.map(|b| b.x1))
        .bind(detection.bbox.map(|b| b.y1))
        .bind(detection.bbox.map(|b| b.x2))
        .bind(detection.bbox.map(|b| b.y2))
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        let record = row.into_record()?;
        record_alert(record.threat.as_str());
        debug!(
            alert_id = record.id,
            threat = %record.threat,
            confidence = record.confidence,
            "alert recorded"
        );

        // Escalation runs after the commit; its failures must never unwind
        // the already-committed row.
        if let Some(escalator) = &self.escalator {
            if let Err(e) = escalator.alert_recorded(&record).await {
                error!(
                    alert_id = record.id,
                    error = %e,
                    "escalation failed; alert remains committed"
                );
            }
        }

        Ok(record)
    }

    /// Most recent alerts, newest first.
    pub async fn recent_alerts(&self, limit: i64) -> StoreResult<Vec<AlertRecord>> {
        let rows: Vec<AlertRow> = sqlx::query_as(
            "SELECT id, created_at, image_ref, threat, label, confidence, x1, y1, x2, y2, location
             FROM alerts ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AlertRow::into_record).collect()
    }

    /// Alerts of one threat class, newest first.
    pub async fn alerts_by_threat(
        &self,
        threat: ThreatClass,
        limit: i64,
    ) -> StoreResult<Vec<AlertRecord>> {
        let rows: Vec<AlertRow> = sqlx::query_as(
            "SELECT id, created_at, image_ref, threat, label, confidence, x1, y1, x2, y2, location
             FROM alerts WHERE threat = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(threat.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AlertRow::into_record).collect()
    }

    /// Alerts inside a time window, newest first. RFC 3339 UTC timestamps
    /// compare lexicographically, so the filter runs on the TEXT column.
    pub async fn alerts_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<AlertRecord>> {
        let rows: Vec<AlertRow> = sqlx::query_as(
            "SELECT id, created_at, image_ref, threat, label, confidence, x1, y1, x2, y2, location
             FROM alerts WHERE created_at >= ? AND created_at <= ?
             ORDER BY id DESC LIMIT ?",
        )
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AlertRow::into_record).collect()
    }

    /// Alerts at or above a confidence tier, newest first.
    pub async fn alerts_at_tier(
        &self,
        tier: ConfidenceTier,
        limit: i64,
    ) -> StoreResult<Vec<AlertRecord>> {
        let rows: Vec<AlertRow> = sqlx::query_as(
            "SELECT id, created_at, image_ref, threat, label, confidence, x1, y1, x2, y2, location
             FROM alerts WHERE confidence >= ? ORDER BY id DESC LIMIT ?",
        )
        .bind(tier.floor())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AlertRow::into_record).collect()
    }

    /// Total stored alerts.
    pub async fn count_alerts(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM alerts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
