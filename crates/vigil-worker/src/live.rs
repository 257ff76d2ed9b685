//! The live-monitor loop.
//!
//! Frame capture and display are hardware collaborators behind the
//! [`FrameSource`]/[`FrameSink`] boundaries. The loop owns its rate-limit
//! timer as explicit local state and retains only the latest detection list
//! for overlay rendering.

use std::time::{Duration, Instant};

use tracing::warn;
use uuid::Uuid;

use vigil_classify::ClassifyProfile;
use vigil_models::Detection;

use crate::error::WorkerResult;
use crate::pipeline::DetectionPipeline;

/// One captured frame, already encoded (JPEG/PNG).
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
}

/// Produces frames from a camera. Returning `Ok(None)` ends the loop.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> WorkerResult<Option<CapturedFrame>>;
}

/// Consumes frames plus the latest detections for overlay rendering. The
/// sink never feeds anything back into classification.
pub trait FrameSink: Send {
    fn present(&mut self, frame: &CapturedFrame, detections: &[Detection]);
}

/// Sink that discards frames, for headless deployments.
#[derive(Debug, Clone, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &CapturedFrame, _detections: &[Detection]) {}
}

/// Minimum-interval timer between extractor invocations.
///
/// Owned by the loop that uses it, alongside its other per-session state.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_fired: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_fired: None,
        }
    }

    /// True when enough time has passed since the last firing; marks the
    /// firing time when it does.
    pub fn fire(&mut self, now: Instant) -> bool {
        let due = self
            .last_fired
            .map_or(true, |last| now.duration_since(last) >= self.min_interval);
        if due {
            self.last_fired = Some(now);
        }
        due
    }
}

/// Processes a live feed frame by frame.
pub struct LiveMonitor {
    pipeline: DetectionPipeline,
    location: String,
    throttle: FrameThrottle,
    /// Latest detections, retained between analyses for overlays.
    last_detections: Vec<Detection>,
}

impl LiveMonitor {
    pub fn new(
        pipeline: DetectionPipeline,
        location: impl Into<String>,
        min_interval: Duration,
    ) -> Self {
        Self {
            pipeline,
            location: location.into(),
            throttle: FrameThrottle::new(min_interval),
            last_detections: Vec::new(),
        }
    }

    /// Latest detections, for overlay consumers.
    pub fn last_detections(&self) -> &[Detection] {
        &self.last_detections
    }

    /// Drive the loop until the source is exhausted.
    ///
    /// Extraction failures skip the current frame and keep the loop alive;
    /// persistence failures propagate and stop it.
    pub async fn run<S: FrameSource, K: FrameSink>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> WorkerResult<()> {
        while let Some(frame) = source.next_frame()? {
            if self.throttle.fire(Instant::now()) {
                let frame_ref = format!("frames/{}.jpg", Uuid::new_v4());
                match self
                    .pipeline
                    .analyze_image(
                        &frame.bytes,
                        &frame_ref,
                        Some(&self.location),
                        ClassifyProfile::LiveFrame,
                    )
                    .await
                {
                    Ok(outcome) => {
                        self.last_detections = outcome.detections;
                    }
                    Err(e) if e.is_recoverable() => {
                        warn!(error = %e, "frame analysis failed; continuing with next frame");
                        self.last_detections.clear();
                    }
                    Err(e) => return Err(e),
                }
            }

            sink.present(&frame, &self.last_detections);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_fires_immediately_then_waits() {
        let mut throttle = FrameThrottle::new(Duration::from_secs(2));
        let start = Instant::now();

        assert!(throttle.fire(start));
        assert!(!throttle.fire(start + Duration::from_millis(500)));
        assert!(!throttle.fire(start + Duration::from_millis(1999)));
        assert!(throttle.fire(start + Duration::from_secs(2)));
        // The window restarts from the second firing.
        assert!(!throttle.fire(start + Duration::from_secs(3)));
        assert!(throttle.fire(start + Duration::from_secs(4)));
    }

    #[test]
    fn test_zero_interval_fires_every_frame() {
        let mut throttle = FrameThrottle::new(Duration::ZERO);
        let start = Instant::now();
        assert!(throttle.fire(start));
        assert!(throttle.fire(start));
        assert!(throttle.fire(start + Duration::from_millis(1)));
    }
}
