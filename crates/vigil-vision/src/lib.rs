//! Client for the external vision perception services.
//!
//! Two independent extractors share one HTTP backend: object localization
//! (labels with normalized 4-vertex polygons) and scene labeling (labels
//! only). Both return an empty list on "nothing found"; failures surface as
//! a recoverable [`VisionError`] and are never retried here; retry policy
//! belongs to the caller.

pub mod client;
pub mod error;
pub mod metrics;
pub mod types;


pub use client::{VisionClient, VisionConfig};
pub use error::{VisionError, VisionResult};
pub use types::{LocalizedObject, SceneLabel, Vertex};

use async_trait::async_trait;
use vigil_models::{LabelSignal, ObjectSignal};

/// Uniform interface over the perception services.
///
/// The pipeline depends on this trait so tests can substitute canned
/// signals for the HTTP client.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Localize objects in the encoded image.
    async fn localize_objects(&self, image: &[u8]) -> VisionResult<Vec<ObjectSignal>>;

    /// Detect scene labels for the encoded image.
    async fn detect_labels(&self, image: &[u8]) -> VisionResult<Vec<LabelSignal>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}
