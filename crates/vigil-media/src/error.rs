//! Error types for frame operations.

use thiserror::Error;

/// Result type for frame operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while handling image frames.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
