//! Worker configuration.

use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// Minimum interval between extractor invocations on the live loop.
    pub frame_interval: Duration,
    /// Location tag recorded for live-camera alerts.
    pub live_location: String,
    /// Optional address for the Prometheus metrics exporter.
    pub metrics_addr: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://vigil.db".to_string(),
            frame_interval: Duration::from_secs(2),
            live_location: "Live Camera".to_string(),
            metrics_addr: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("VIGIL_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://vigil.db".to_string()),
            frame_interval: Duration::from_secs(
                std::env::var("VIGIL_FRAME_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ),
            live_location: std::env::var("VIGIL_LIVE_LOCATION")
                .unwrap_or_else(|_| "Live Camera".to_string()),
            metrics_addr: std::env::var("VIGIL_METRICS_ADDR").ok(),
        }
    }
}
