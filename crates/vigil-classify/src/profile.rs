//! Calling-context profiles.

use serde::{Deserialize, Serialize};

/// Where the frame under classification came from.
///
/// The two call sites differ deliberately: live frames are sampled densely,
/// so the fire-label bar drops to keep latency acceptable, false-positive
/// suppression turns on, and ignition-source objects count as fire evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyProfile {
    /// One-off analysis of an uploaded still image.
    #[default]
    SingleImage,
    /// Sampled frame from a live camera feed.
    LiveFrame,
}

impl ClassifyProfile {
    /// Minimum scene-label score for the label-based fire strategy.
    pub fn fire_label_threshold(&self) -> f64 {
        match self {
            ClassifyProfile::SingleImage => 0.70,
            ClassifyProfile::LiveFrame => 0.50,
        }
    }

    /// Whether the false-positive ignore list applies.
    pub fn applies_ignore_list(&self) -> bool {
        matches!(self, ClassifyProfile::LiveFrame)
    }

    /// Whether ignition-source objects (lighter, candle, torch) count as
    /// fire evidence.
    pub fn detects_fire_objects(&self) -> bool {
        matches!(self, ClassifyProfile::LiveFrame)
    }
}
