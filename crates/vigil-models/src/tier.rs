//! Confidence tiers gating escalation behavior.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold band derived from a detection's confidence.
///
/// `Critical` alerts notify configured destinations; `Emergency` alerts
/// additionally auto-provision emergency-service contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Below the escalation floor; stored only.
    Routine,
    /// Confidence >= 0.50.
    Critical,
    /// Confidence >= 0.80.
    Emergency,
}

impl ConfidenceTier {
    /// Minimum confidence for the Critical tier.
    pub const CRITICAL_FLOOR: f64 = 0.50;

    /// Minimum confidence for the Emergency tier.
    pub const EMERGENCY_FLOOR: f64 = 0.80;

    /// Classify a confidence value into its tier.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= Self::EMERGENCY_FLOOR {
            ConfidenceTier::Emergency
        } else if confidence >= Self::CRITICAL_FLOOR {
            ConfidenceTier::Critical
        } else {
            ConfidenceTier::Routine
        }
    }

    /// Lower confidence bound for this tier.
    pub fn floor(&self) -> f64 {
        match self {
            ConfidenceTier::Routine => 0.0,
            ConfidenceTier::Critical => Self::CRITICAL_FLOOR,
            ConfidenceTier::Emergency => Self::EMERGENCY_FLOOR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Routine => "routine",
            ConfidenceTier::Critical => "critical",
            ConfidenceTier::Emergency => "emergency",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
