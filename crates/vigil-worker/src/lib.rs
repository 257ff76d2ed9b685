//! End-to-end monitoring pipeline.
//!
//! One worker processes an image synchronously in sequence: extraction
//! (vision services + color segmenter) → fusion → persistence → escalation
//! (inside the store, via its injected collaborator). Multiple workers may
//! run concurrently; the store serializes inserts.

pub mod config;
pub mod error;
pub mod live;
pub mod pipeline;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use live::{CapturedFrame, FrameSink, FrameSource, LiveMonitor};
pub use pipeline::{AnalysisOutcome, DetectionPipeline};
