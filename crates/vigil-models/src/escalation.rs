//! Escalation audit records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::threat::ThreatClass;

/// Status recorded once an escalation attempt is written.
///
/// There are no retry states in this pipeline; delivery is handed to the
/// notification transport out of band.
pub const STATUS_SENT: &str = "sent";

/// Audit entry linking one alert to one destination.
///
/// Both references are weak: the alert belongs to the alert store and the
/// destination may be deactivated later; history rows are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EscalationRecord {
    pub id: i64,
    pub alert_id: i64,
    pub destination_id: i64,
    pub location: String,
    pub threat: ThreatClass,
    pub sent_at: DateTime<Utc>,
    pub status: String,
}
