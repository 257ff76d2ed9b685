//! Escalation destinations and emergency-service resolution.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::threat::ThreatClass;

/// A configured or auto-provisioned recipient of escalation for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Destination {
    pub id: i64,
    pub location: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a destination. Contact channels are optional but
/// validated when present.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct NewDestination {
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewDestination {
    pub fn new(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    pub fn with_contacts(
        mut self,
        email: Option<impl Into<String>>,
        phone: Option<impl Into<String>>,
    ) -> Self {
        self.email = email.map(Into::into);
        self.phone = phone.map(Into::into);
        self
    }
}

/// Emergency services that can be auto-provisioned as destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyService {
    FireBrigade,
    Police,
}

impl EmergencyService {
    /// Resolve the emergency service for an alert class.
    ///
    /// Aggression intentionally has no mapping: posture-derived evidence is
    /// too weak to page a responder automatically (see DESIGN.md).
    pub fn for_threat(threat: ThreatClass) -> Option<Self> {
        match threat {
            ThreatClass::Fire => Some(EmergencyService::FireBrigade),
            ThreatClass::Weapon => Some(EmergencyService::Police),
            _ => None,
        }
    }

    /// Substring used to find an existing provisioned destination by name.
    pub fn name_pattern(&self) -> &'static str {
        match self {
            EmergencyService::FireBrigade => "fire brigade",
            EmergencyService::Police => "police",
        }
    }

    /// Display name of an auto-provisioned destination for a location.
    pub fn destination_name(&self, location: &str) -> String {
        match self {
            EmergencyService::FireBrigade => format!("Fire Brigade Service - {location}"),
            EmergencyService::Police => format!("Police Service - {location}"),
        }
    }

    /// Fixed default contact channels for provisioned services.
    pub fn default_contacts(&self) -> (&'static str, &'static str) {
        match self {
            EmergencyService::FireBrigade => ("firebrigade@emergencies.gov", "911"),
            EmergencyService::Police => ("police@emergencies.gov", "911"),
        }
    }
}
