//! Signal fusion and threat classification.
//!
//! Independent per-category rules run against the union of raw signals from
//! all extractors for one image; a single image may yield detections of
//! several types at once. Aggression is the exception: its three strategies
//! run under strict precedence and emit at most one detection per image.

pub mod classifier;
pub mod profile;
pub mod vocab;

pub use classifier::{infer_threat_from_label, Classifier, SignalSet, Thresholds};
pub use profile::ClassifyProfile;
