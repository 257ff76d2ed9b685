//! The per-image detection pipeline.

use std::sync::Arc;

use tracing::{debug, info};

use vigil_classify::{Classifier, ClassifyProfile, SignalSet};
use vigil_media::FireSegmenter;
use vigil_models::{AlertRecord, Detection};
use vigil_store::AlertStore;
use vigil_vision::VisionBackend;

use crate::error::WorkerResult;

/// What one image produced: the classifier's detections and the alert rows
/// they became.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    pub detections: Vec<Detection>,
    pub alerts: Vec<AlertRecord>,
}

impl AnalysisOutcome {
    pub fn is_clear(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Runs one image end-to-end: extraction → fusion → persistence.
///
/// Escalation happens inside the store, which was constructed with the
/// router injected; nothing here needs to know about it.
pub struct DetectionPipeline {
    vision: Arc<dyn VisionBackend>,
    segmenter: FireSegmenter,
    classifier: Classifier,
    store: AlertStore,
}

impl DetectionPipeline {
    pub fn new(vision: Arc<dyn VisionBackend>, store: AlertStore) -> Self {
        Self {
            vision,
            segmenter: FireSegmenter::default(),
            classifier: Classifier::default(),
            store,
        }
    }

    /// Analyze one encoded image and persist every detection.
    ///
    /// Extraction failures are recoverable for the caller (skip the frame);
    /// persistence failures propagate: a detection that cannot be stored
    /// must not disappear.
    pub async fn analyze_image(
        &self,
        image: &[u8],
        image_ref: &str,
        location: Option<&str>,
        profile: ClassifyProfile,
    ) -> WorkerResult<AnalysisOutcome> {
        let frame = vigil_media::decode_frame(image)?;

        // The two service extractors run concurrently; the color segmenter
        // is local and cheap.
        let (objects, labels) = tokio::try_join!(
            self.vision.localize_objects(image),
            self.vision.detect_labels(image),
        )?;
        let fire_color = self.segmenter.segment(&frame);

        let signals = SignalSet::new(objects, labels, fire_color);
        let detections = self.classifier.classify(&signals, profile);

        let mut alerts = Vec::with_capacity(detections.len());
        for detection in &detections {
            let alert = self.store.record(detection, image_ref, location).await?;
            alerts.push(alert);
        }

        if alerts.is_empty() {
            debug!(image_ref, "image clear, no threats detected");
        } else {
            info!(
                image_ref,
                count = alerts.len(),
                "threats detected and recorded"
            );
        }

        Ok(AnalysisOutcome { detections, alerts })
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }
}
