//! Threat class definitions.
//!
//! Every detection and persisted alert carries one of these classes:
//!
//! - `Weapon`: dangerous hand-held object localized in frame
//! - `Fire`: flame/smoke evidence from color segmentation or scene labels
//! - `Vehicle`: suspicious vehicle localized in frame
//! - `Aggression`: physical-violence evidence from scene labels or postures
//! - `Other`: catch-all for records that predate classification

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Classified threat category for a detection or alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThreatClass {
    Weapon,
    Fire,
    Vehicle,
    Aggression,
    #[default]
    Other,
}

impl ThreatClass {
    /// All threat classes.
    pub const ALL: &'static [ThreatClass] = &[
        ThreatClass::Weapon,
        ThreatClass::Fire,
        ThreatClass::Vehicle,
        ThreatClass::Aggression,
        ThreatClass::Other,
    ];

    /// Returns the class name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatClass::Weapon => "weapon",
            ThreatClass::Fire => "fire",
            ThreatClass::Vehicle => "vehicle",
            ThreatClass::Aggression => "aggression",
            ThreatClass::Other => "other",
        }
    }

    /// Returns true if alerts of this class are eligible for escalation.
    ///
    /// Suspicious vehicles are recorded but never escalated; they are
    /// context for patrol review, not a dispatchable emergency.
    pub fn is_escalatable(&self) -> bool {
        matches!(
            self,
            ThreatClass::Weapon | ThreatClass::Fire | ThreatClass::Aggression
        )
    }
}

impl fmt::Display for ThreatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThreatClass {
    type Err = ThreatClassParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weapon" => Ok(ThreatClass::Weapon),
            "fire" => Ok(ThreatClass::Fire),
            "vehicle" => Ok(ThreatClass::Vehicle),
            "aggression" => Ok(ThreatClass::Aggression),
            "other" => Ok(ThreatClass::Other),
            _ => Err(ThreatClassParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown threat class: {0}")]
pub struct ThreatClassParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_parse() {
        assert_eq!("weapon".parse::<ThreatClass>().unwrap(), ThreatClass::Weapon);
        assert_eq!("Fire".parse::<ThreatClass>().unwrap(), ThreatClass::Fire);
        assert_eq!("other".parse::<ThreatClass>().unwrap(), ThreatClass::Other);
        assert!("bogus".parse::<ThreatClass>().is_err());
    }

    #[test]
    fn test_threat_display() {
        assert_eq!(ThreatClass::Aggression.to_string(), "aggression");
        assert_eq!(ThreatClass::Vehicle.to_string(), "vehicle");
    }

    #[test]
    fn test_escalation_eligibility() {
        assert!(ThreatClass::Weapon.is_escalatable());
        assert!(ThreatClass::Fire.is_escalatable());
        assert!(ThreatClass::Aggression.is_escalatable());
        assert!(!ThreatClass::Vehicle.is_escalatable());
        assert!(!ThreatClass::Other.is_escalatable());
    }
}
