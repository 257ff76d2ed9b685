//! Persisted alert records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::threat::ThreatClass;
use crate::tier::ConfidenceTier;

/// The persisted, immutable record of a [`crate::Detection`].
///
/// Rows are append-only: the store assigns `id` and `created_at` at insert
/// and nothing in the pipeline updates them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlertRecord {
    /// Monotonically increasing identifier, assigned at insert.
    pub id: i64,

    /// Insert timestamp.
    pub created_at: DateTime<Utc>,

    /// Reference to the analyzed image (path or storage key).
    pub image_ref: String,

    /// Threat category.
    pub threat: ThreatClass,

    /// Description of the matched evidence.
    pub label: String,

    /// Confidence in [0.0, 1.0].
    pub confidence: f64,

    /// Normalized bounding box, when the evidence had spatial extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,

    /// Location where the image was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AlertRecord {
    /// Confidence tier of this alert.
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_confidence(self.confidence)
    }

    /// Location, treating empty strings the same as absent.
    pub fn location_trimmed(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// One-line summary handed to notification transports.
    pub fn summary(&self) -> String {
        match self.location_trimmed() {
            Some(loc) => format!(
                "{} alert at {}: {} ({:.0}%)",
                self.threat,
                loc,
                self.label,
                self.confidence * 100.0
            ),
            None => format!(
                "{} alert: {} ({:.0}%)",
                self.threat,
                self.label,
                self.confidence * 100.0
            ),
        }
    }
}
