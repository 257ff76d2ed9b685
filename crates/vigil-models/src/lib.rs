//! Shared data models for the Vigil monitoring pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Threat classes and confidence tiers
//! - Raw extractor signals and classifier detections with normalized
//!   bounding boxes
//! - Persisted alerts, escalation destinations, and escalation history
//! - Emergency-service resolution rules

pub mod alert;
pub mod bbox;
pub mod destination;
pub mod detection;
pub mod escalation;
pub mod signal;
pub mod threat;
pub mod tier;

// Re-export common types
pub use alert::AlertRecord;
pub use bbox::BoundingBox;
pub use destination::{Destination, EmergencyService, NewDestination};
pub use detection::Detection;
pub use escalation::{EscalationRecord, STATUS_SENT};
pub use signal::{FireColorSignal, LabelSignal, ObjectSignal, FIRE_BY_COLOR_LABEL};
pub use threat::{ThreatClass, ThreatClassParseError};
pub use tier::ConfidenceTier;
