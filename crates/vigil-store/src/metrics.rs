//! Metric names and helpers for store operations.

/// Metric name constants.
pub mod names {
    pub const ALERTS_RECORDED: &str = "vigil_alerts_recorded_total";
    pub const ESCALATIONS_RECORDED: &str = "vigil_escalations_recorded_total";
    pub const DESTINATIONS_CREATED: &str = "vigil_destinations_created_total";
}

pub fn record_alert(threat: &'static str) {
    metrics::counter!(names::ALERTS_RECORDED, "threat" => threat).increment(1);
}

pub fn record_escalation() {
    metrics::counter!(names::ESCALATIONS_RECORDED).increment(1);
}

pub fn record_destination() {
    metrics::counter!(names::DESTINATIONS_CREATED).increment(1);
}
