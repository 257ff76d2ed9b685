//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Vision service error: {0}")]
    Vision(#[from] vigil_vision::VisionError),

    #[error("Frame error: {0}")]
    Media(#[from] vigil_media::MediaError),

    #[error("Persistence error: {0}")]
    Store(#[from] vigil_store::StoreError),

    #[error("Frame capture failed: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the current frame can simply be skipped.
    ///
    /// Extraction failures (service outage, quota, undecodable frame) are
    /// recoverable: the frame yields no detections and the loop continues.
    /// Persistence failures are not: a detection must never be dropped
    /// silently.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WorkerError::Vision(_) | WorkerError::Media(_))
    }
}
