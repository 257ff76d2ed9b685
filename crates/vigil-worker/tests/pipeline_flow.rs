//! End-to-end pipeline tests with a stubbed vision backend and an
//! in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vigil_classify::ClassifyProfile;
use vigil_escalate::{EscalationRouter, LogTransport};
use vigil_models::{BoundingBox, Detection, LabelSignal, ObjectSignal, ThreatClass};
use vigil_store::AlertStore;
use vigil_vision::{VisionBackend, VisionError, VisionResult};
use vigil_worker::{CapturedFrame, DetectionPipeline, FrameSink, FrameSource, LiveMonitor};

struct StubVision {
    objects: Vec<ObjectSignal>,
    labels: Vec<LabelSignal>,
    fail: bool,
}

impl StubVision {
    fn empty() -> Self {
        Self {
            objects: Vec::new(),
            labels: Vec::new(),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            objects: Vec::new(),
            labels: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl VisionBackend for StubVision {
    async fn localize_objects(&self, _image: &[u8]) -> VisionResult<Vec<ObjectSignal>> {
        if self.fail {
            return Err(VisionError::from_http_status(503, "annotator down"));
        }
        Ok(self.objects.clone())
    }

    async fn detect_labels(&self, _image: &[u8]) -> VisionResult<Vec<LabelSignal>> {
        if self.fail {
            return Err(VisionError::from_http_status(503, "annotator down"));
        }
        Ok(self.labels.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn png_frame(color: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(200, 200, image::Rgb(color));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageOutputFormat::Png)
        .unwrap();
    buf.into_inner()
}

const BLACK: [u8; 3] = [0, 0, 0];
const FLAME_ORANGE: [u8; 3] = [255, 140, 0];

#[tokio::test]
async fn test_weapon_flows_from_signal_to_escalation() {
    let vision = Arc::new(StubVision {
        objects: vec![ObjectSignal::new(
            "Pistol",
            0.92,
            BoundingBox::new(0.1, 0.2, 0.4, 0.6),
        )],
        labels: Vec::new(),
        fail: false,
    });

    let db = AlertStore::in_memory().await.unwrap();
    let router = Arc::new(EscalationRouter::new(db.clone(), Arc::new(LogTransport)));
    let store = db.clone().with_escalator(router);
    let pipeline = DetectionPipeline::new(vision, store);

    let outcome = pipeline
        .analyze_image(
            &png_frame(BLACK),
            "img/plaza.jpg",
            Some("Plaza Central"),
            ClassifyProfile::SingleImage,
        )
        .await
        .unwrap();

    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.alerts.len(), 1);
    let alert = &outcome.alerts[0];
    assert_eq!(alert.threat, ThreatClass::Weapon);
    assert!((alert.confidence - 0.92).abs() < 1e-9);

    // 0.92 >= 0.80: police provisioned and one escalation written.
    let police = db
        .find_emergency_destination("Plaza Central", "police")
        .await
        .unwrap()
        .expect("police provisioned");
    let escalations = db.escalations_for_alert(alert.id).await.unwrap();
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].destination_id, police.id);
}

#[tokio::test]
async fn test_fire_by_color_recorded_without_location() {
    let vision = Arc::new(StubVision::empty());
    let db = AlertStore::in_memory().await.unwrap();
    let pipeline = DetectionPipeline::new(vision, db.clone());

    let outcome = pipeline
        .analyze_image(
            &png_frame(FLAME_ORANGE),
            "img/orange.jpg",
            None,
            ClassifyProfile::SingleImage,
        )
        .await
        .unwrap();

    assert_eq!(outcome.detections.len(), 1);
    let detection = &outcome.detections[0];
    assert_eq!(detection.threat, ThreatClass::Fire);
    assert_eq!(detection.label, "fire-by-color");
    assert!(detection.bbox.is_some());

    assert_eq!(db.count_alerts().await.unwrap(), 1);
    assert!(db.recent_escalations(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vision_outage_is_recoverable_and_records_nothing() {
    let vision = Arc::new(StubVision::failing());
    let db = AlertStore::in_memory().await.unwrap();
    let pipeline = DetectionPipeline::new(vision, db.clone());

    let err = pipeline
        .analyze_image(
            &png_frame(BLACK),
            "img/a.jpg",
            None,
            ClassifyProfile::SingleImage,
        )
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(db.count_alerts().await.unwrap(), 0);
}

#[tokio::test]
async fn test_undecodable_image_is_recoverable() {
    let vision = Arc::new(StubVision::empty());
    let db = AlertStore::in_memory().await.unwrap();
    let pipeline = DetectionPipeline::new(vision, db.clone());

    let err = pipeline
        .analyze_image(
            b"not an image",
            "img/bad.bin",
            None,
            ClassifyProfile::SingleImage,
        )
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(db.count_alerts().await.unwrap(), 0);
}

struct VecSource {
    frames: Vec<Vec<u8>>,
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> vigil_worker::WorkerResult<Option<CapturedFrame>> {
        Ok(self.frames.pop().map(|bytes| CapturedFrame { bytes }))
    }
}

struct RecordingSink {
    frames: usize,
    detections_seen: Vec<usize>,
}

impl FrameSink for RecordingSink {
    fn present(&mut self, _frame: &CapturedFrame, detections: &[Detection]) {
        self.frames += 1;
        self.detections_seen.push(detections.len());
    }
}

#[tokio::test]
async fn test_live_monitor_analyzes_each_due_frame() {
    let vision = Arc::new(StubVision::empty());
    let db = AlertStore::in_memory().await.unwrap();
    let pipeline = DetectionPipeline::new(vision, db.clone());

    let mut monitor = LiveMonitor::new(pipeline, "Live Camera", Duration::ZERO);
    let mut source = VecSource {
        frames: vec![
            png_frame(FLAME_ORANGE),
            png_frame(FLAME_ORANGE),
            png_frame(FLAME_ORANGE),
        ],
    };
    let mut sink = RecordingSink {
        frames: 0,
        detections_seen: Vec::new(),
    };

    monitor.run(&mut source, &mut sink).await.unwrap();

    assert_eq!(sink.frames, 3);
    // Every frame is orange, so every presented frame carries one detection.
    assert!(sink.detections_seen.iter().all(|&n| n == 1));
    assert_eq!(db.count_alerts().await.unwrap(), 3);
    assert_eq!(monitor.last_detections().len(), 1);
}

#[tokio::test]
async fn test_live_monitor_survives_vision_outage() {
    let vision = Arc::new(StubVision::failing());
    let db = AlertStore::in_memory().await.unwrap();
    let pipeline = DetectionPipeline::new(vision, db.clone());

    let mut monitor = LiveMonitor::new(pipeline, "Live Camera", Duration::ZERO);
    let mut source = VecSource {
        frames: vec![png_frame(FLAME_ORANGE), png_frame(FLAME_ORANGE)],
    };
    let mut sink = RecordingSink {
        frames: 0,
        detections_seen: Vec::new(),
    };

    // The outage never kills the loop; frames simply carry no detections.
    monitor.run(&mut source, &mut sink).await.unwrap();

    assert_eq!(sink.frames, 2);
    assert!(sink.detections_seen.iter().all(|&n| n == 0));
    assert_eq!(db.count_alerts().await.unwrap(), 0);
}

#[tokio::test]
async fn test_throttled_monitor_reuses_last_detections() {
    let vision = Arc::new(StubVision::empty());
    let db = AlertStore::in_memory().await.unwrap();
    let pipeline = DetectionPipeline::new(vision, db.clone());

    // A long interval: only the first frame is analyzed, the remaining
    // frames are presented with the retained detection list.
    let mut monitor = LiveMonitor::new(pipeline, "Live Camera", Duration::from_secs(3600));
    let mut source = VecSource {
        frames: vec![
            png_frame(FLAME_ORANGE),
            png_frame(FLAME_ORANGE),
            png_frame(FLAME_ORANGE),
        ],
    };
    let mut sink = RecordingSink {
        frames: 0,
        detections_seen: Vec::new(),
    };

    monitor.run(&mut source, &mut sink).await.unwrap();

    assert_eq!(sink.frames, 3);
    assert_eq!(db.count_alerts().await.unwrap(), 1);
    assert!(sink.detections_seen.iter().all(|&n| n == 1));
}
