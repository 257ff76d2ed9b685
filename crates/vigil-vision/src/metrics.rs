//! Metric names and helpers for vision-service calls.

/// Metric name constants.
pub mod names {
    pub const VISION_REQUESTS: &str = "vigil_vision_requests_total";
    pub const VISION_ERRORS: &str = "vigil_vision_errors_total";
    pub const VISION_SIGNALS: &str = "vigil_vision_signals_total";
}

/// Record one service call and its outcome.
pub fn record_request(endpoint: &'static str, success: bool) {
    metrics::counter!(names::VISION_REQUESTS, "endpoint" => endpoint).increment(1);
    if !success {
        metrics::counter!(names::VISION_ERRORS, "endpoint" => endpoint).increment(1);
    }
}

/// Record how many raw signals a call produced.
pub fn record_signals(endpoint: &'static str, count: usize) {
    metrics::counter!(names::VISION_SIGNALS, "endpoint" => endpoint).increment(count as u64);
}
