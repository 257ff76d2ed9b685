//! Raw candidate signals produced by the extractors.
//!
//! These are the classifier's inputs: localization signals (label + score +
//! bbox), scene-label signals (label + score), and the color segmenter's
//! fire signal. An empty signal set is a normal outcome.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;

/// Label carried by the color segmenter's candidate signal.
pub const FIRE_BY_COLOR_LABEL: &str = "fire-by-color";

/// Raw object-localization signal with the polygon already reduced to a
/// bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectSignal {
    pub label: String,
    pub score: f64,
    pub bbox: BoundingBox,
}

impl ObjectSignal {
    pub fn new(label: impl Into<String>, score: f64, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            score,
            bbox,
        }
    }
}

/// Raw scene-label signal; no spatial extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelSignal {
    pub label: String,
    pub score: f64,
}

impl LabelSignal {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Candidate fire signal from the color segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FireColorSignal {
    /// Masked fraction of the frame, in percent.
    pub frame_percent: f64,
    /// Score derived from coverage, capped at 0.95.
    pub score: f64,
    /// Normalized bounding rectangle of the largest flame-colored region.
    pub bbox: BoundingBox,
}
