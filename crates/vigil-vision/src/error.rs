//! Vision service error types.

use thiserror::Error;

/// Result type for vision service operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors from the external perception services.
///
/// All variants are recoverable at the pipeline level: the current frame
/// yields no detections and processing continues with the next one.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Quota exhausted or rate limited: {0}")]
    QuotaExceeded(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VisionError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an HTTP status to a typed error.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::AuthError(body),
            429 => Self::QuotaExceeded(body),
            500..=599 => Self::ServerError(status, body),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VisionError::Network(_) | VisionError::QuotaExceeded(_) | VisionError::ServerError(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            VisionError::from_http_status(401, "no key"),
            VisionError::AuthError(_)
        ));
        assert!(matches!(
            VisionError::from_http_status(429, "slow down"),
            VisionError::QuotaExceeded(_)
        ));
        assert!(matches!(
            VisionError::from_http_status(503, "overloaded"),
            VisionError::ServerError(503, _)
        ));
        assert!(matches!(
            VisionError::from_http_status(400, "bad image"),
            VisionError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(VisionError::from_http_status(429, "").is_retryable());
        assert!(VisionError::from_http_status(500, "").is_retryable());
        assert!(!VisionError::from_http_status(401, "").is_retryable());
        assert!(!VisionError::from_http_status(400, "").is_retryable());
        assert!(!VisionError::invalid_response("garbage").is_retryable());
    }
}
