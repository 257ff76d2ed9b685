//! Classifier output records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::threat::ThreatClass;

/// A typed, scored candidate threat produced by the classifier for one image.
///
/// Detections are ephemeral: they exist between classification and
/// persistence, where each one becomes an [`crate::AlertRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Threat category.
    pub threat: ThreatClass,

    /// Free-text description of the matched evidence.
    pub label: String,

    /// Confidence in [0.0, 1.0].
    pub confidence: f64,

    /// Normalized bounding box; absent for signals with no spatial extent
    /// (scene-label-only fire, aggression).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl Detection {
    /// Create a detection, clamping confidence into [0.0, 1.0].
    pub fn new(
        threat: ThreatClass,
        label: impl Into<String>,
        confidence: f64,
        bbox: Option<BoundingBox>,
    ) -> Self {
        Self {
            threat,
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bbox,
        }
    }

    /// Detection with a bounding box.
    pub fn with_bbox(
        threat: ThreatClass,
        label: impl Into<String>,
        confidence: f64,
        bbox: BoundingBox,
    ) -> Self {
        Self::new(threat, label, confidence, Some(bbox))
    }

    /// Detection with full-frame (unlocalized) extent.
    pub fn unlocalized(threat: ThreatClass, label: impl Into<String>, confidence: f64) -> Self {
        Self::new(threat, label, confidence, None)
    }
}
