//! Fusion of raw extractor signals into typed detections.

use tracing::debug;

use vigil_models::{
    Detection, FireColorSignal, LabelSignal, ObjectSignal, ThreatClass, FIRE_BY_COLOR_LABEL,
};

use crate::profile::ClassifyProfile;
use crate::vocab;

/// Fixed label for the posture-pair aggression strategy.
const POSTURE_PAIR_LABEL: &str = "person on the ground with another standing (possible assault)";

/// Category thresholds. These are fixed configuration, not learned.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Minimum localization score for a weapon match.
    pub weapon_min_score: f64,
    /// Minimum localization score for a vehicle match.
    pub vehicle_min_score: f64,
    /// Minimum localization score for an ignition-source object.
    pub fire_object_min_score: f64,
    /// Minimum frame coverage (percent) for the color-based fire strategy.
    pub fire_color_min_percent: f64,
    /// Minimum label score for direct aggression evidence.
    pub aggression_direct_min_score: f64,
    /// Minimum label score considered by the contextual aggression strategy.
    pub aggression_context_min_score: f64,
    /// Additive boost applied to the contextual weighted mean.
    pub aggression_context_boost: f64,
    /// Upper bound on contextual aggression confidence.
    pub aggression_context_cap: f64,
    /// Fixed confidence of the posture-pair strategy.
    pub posture_pair_confidence: f64,
    /// Vertical bbox-center threshold separating "on ground" from "standing".
    pub ground_center_y: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            weapon_min_score: 0.50,
            vehicle_min_score: 0.60,
            fire_object_min_score: 0.55,
            fire_color_min_percent: 0.3,
            aggression_direct_min_score: 0.40,
            aggression_context_min_score: 0.35,
            aggression_context_boost: 0.2,
            aggression_context_cap: 0.75,
            posture_pair_confidence: 0.65,
            ground_center_y: 0.7,
        }
    }
}

/// Union of raw signals gathered from all extractors for one image.
#[derive(Debug, Clone, Default)]
pub struct SignalSet {
    pub objects: Vec<ObjectSignal>,
    pub labels: Vec<LabelSignal>,
    pub fire_color: Option<FireColorSignal>,
}

impl SignalSet {
    pub fn new(
        objects: Vec<ObjectSignal>,
        labels: Vec<LabelSignal>,
        fire_color: Option<FireColorSignal>,
    ) -> Self {
        Self {
            objects,
            labels,
            fire_color,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.labels.is_empty() && self.fire_color.is_none()
    }
}

/// Multi-strategy threat classifier.
///
/// Rules per category are independent; one image may produce detections of
/// several classes at once. Aggression emits at most one detection, chosen
/// by strict strategy precedence.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify the fused signals for one image.
    pub fn classify(&self, signals: &SignalSet, profile: ClassifyProfile) -> Vec<Detection> {
        let mut detections = Vec::new();

        self.classify_objects(signals, profile, &mut detections);
        self.classify_fire(signals, profile, &mut detections);
        if let Some(aggression) = self.classify_aggression(signals, profile) {
            detections.push(aggression);
        }

        debug!(
            count = detections.len(),
            profile = ?profile,
            "classification complete"
        );
        detections
    }

    /// Weapon/vehicle (and, on live frames, ignition-source) rules over the
    /// localization signals. One detection per matching signal; the first
    /// vocabulary term that matches decides, with no scoring across terms.
    fn classify_objects(
        &self,
        signals: &SignalSet,
        profile: ClassifyProfile,
        out: &mut Vec<Detection>,
    ) {
        for obj in &signals.objects {
            let label = obj.label.to_lowercase();

            if profile.applies_ignore_list() && vocab::IGNORED.matches(&label) {
                debug!(label = %label, "localization suppressed by ignore list");
                continue;
            }

            if vocab::DANGER.matches(&label) && obj.score >= self.thresholds.weapon_min_score {
                out.push(Detection::with_bbox(
                    ThreatClass::Weapon,
                    label.clone(),
                    obj.score,
                    obj.bbox,
                ));
            }

            if vocab::VEHICLES.matches(&label) && obj.score >= self.thresholds.vehicle_min_score {
                out.push(Detection::with_bbox(
                    ThreatClass::Vehicle,
                    label.clone(),
                    obj.score,
                    obj.bbox,
                ));
            }

            if profile.detects_fire_objects()
                && vocab::FIRE_OBJECTS.matches(&label)
                && obj.score >= self.thresholds.fire_object_min_score
            {
                out.push(Detection::with_bbox(
                    ThreatClass::Fire,
                    format!("{label} (ignition source)"),
                    obj.score,
                    obj.bbox,
                ));
            }
        }
    }

    /// Two independent fire strategies; both may fire for the same frame and
    /// are never merged into one event.
    fn classify_fire(
        &self,
        signals: &SignalSet,
        profile: ClassifyProfile,
        out: &mut Vec<Detection>,
    ) {
        // (a) color segmentation: localized evidence with the segmenter's score.
        if let Some(fire) = &signals.fire_color {
            if fire.frame_percent >= self.thresholds.fire_color_min_percent {
                out.push(Detection::with_bbox(
                    ThreatClass::Fire,
                    FIRE_BY_COLOR_LABEL,
                    fire.score,
                    fire.bbox,
                ));
            }
        }

        // (b) scene labels: no bbox, full-frame extent is the conservative
        // default when only label evidence exists.
        let threshold = profile.fire_label_threshold();
        for label in &signals.labels {
            let text = label.label.to_lowercase();
            if profile.applies_ignore_list() && vocab::IGNORED.matches(&text) {
                continue;
            }
            if label.score >= threshold && vocab::FIRE_LABELS.matches(&text) {
                out.push(Detection::unlocalized(ThreatClass::Fire, text, label.score));
            }
        }
    }

    /// Aggression: exactly 0 or 1 detection, strategies in strict precedence.
    /// Direct label evidence is the most specific and must never be
    /// overridden; the posture pair is a geometric proxy and runs last.
    fn classify_aggression(
        &self,
        signals: &SignalSet,
        profile: ClassifyProfile,
    ) -> Option<Detection> {
        let labels: Vec<(String, f64)> = signals
            .labels
            .iter()
            .map(|l| (l.label.to_lowercase(), l.score))
            .filter(|(text, _)| {
                !(profile.applies_ignore_list() && vocab::IGNORED.matches(text))
            })
            .collect();

        if let Some(direct) = self.aggression_direct(&labels) {
            return Some(direct);
        }

        let (persons, on_ground, standing) = self.person_postures(signals);

        if persons >= 2 {
            if let Some(contextual) = self.aggression_contextual(&labels) {
                return Some(contextual);
            }
        }

        if on_ground >= 1 && standing >= 1 {
            return Some(Detection::unlocalized(
                ThreatClass::Aggression,
                POSTURE_PAIR_LABEL,
                self.thresholds.posture_pair_confidence,
            ));
        }

        None
    }

    /// Strategy 1: a scene label contains a direct aggression term. The
    /// highest-scoring match decides confidence and description.
    fn aggression_direct(&self, labels: &[(String, f64)]) -> Option<Detection> {
        let mut best: Option<(&str, f64)> = None;
        for (text, score) in labels {
            if *score < self.thresholds.aggression_direct_min_score {
                continue;
            }
            if vocab::AGGRESSION_DIRECT.matches(text)
                && best.map_or(true, |(_, s)| *score > s)
            {
                best = Some((text.as_str(), *score));
            }
        }
        best.map(|(text, score)| Detection::unlocalized(ThreatClass::Aggression, text, score))
    }

    /// Strategy 2: multiple people plus accumulated action/posture context.
    /// Action terms weigh at full score, posture terms at half; a label may
    /// contribute under both.
    fn aggression_contextual(&self, labels: &[(String, f64)]) -> Option<Detection> {
        let mut matched: Vec<(&str, f64)> = Vec::new();

        for (text, score) in labels {
            if *score < self.thresholds.aggression_context_min_score {
                continue;
            }
            if vocab::ACTION_TERMS.matches(text) {
                matched.push((text.as_str(), *score));
            }
            if vocab::POSTURE_TERMS.matches(text) {
                matched.push((text.as_str(), *score * 0.5));
            }
        }

        if matched.len() < 2 {
            return None;
        }

        let mean = matched.iter().map(|(_, w)| w).sum::<f64>() / matched.len() as f64;
        let confidence = (mean + self.thresholds.aggression_context_boost)
            .min(self.thresholds.aggression_context_cap);

        let descriptions: Vec<&str> = matched.iter().take(3).map(|(t, _)| *t).collect();
        Some(Detection::unlocalized(
            ThreatClass::Aggression,
            format!("conflict context ({})", descriptions.join(", ")),
            confidence,
        ))
    }

    /// Count "person" localizations and split them by posture from the
    /// vertical bbox center.
    fn person_postures(&self, signals: &SignalSet) -> (usize, usize, usize) {
        let mut persons = 0;
        let mut on_ground = 0;
        let mut standing = 0;

        for obj in &signals.objects {
            if !obj.label.to_lowercase().contains("person") {
                continue;
            }
            persons += 1;
            if obj.bbox.center_y() > self.thresholds.ground_center_y {
                on_ground += 1;
            } else {
                standing += 1;
            }
        }

        (persons, on_ground, standing)
    }
}

/// Helper used by the offline backfill tool: infer a threat class from a
/// stored label using the same substring rules as live classification.
///
/// Danger terms are checked before fire terms: "firearm" contains "fire"
/// and must come out as a weapon.
pub fn infer_threat_from_label(label: &str) -> ThreatClass {
    let label = label.to_lowercase();
    if vocab::DANGER.matches(&label) {
        ThreatClass::Weapon
    } else if label.starts_with(FIRE_BY_COLOR_LABEL) || vocab::FIRE_LABELS.matches(&label) {
        ThreatClass::Fire
    } else if vocab::AGGRESSION_DIRECT.matches(&label) {
        ThreatClass::Aggression
    } else if vocab::VEHICLES.matches(&label) {
        ThreatClass::Vehicle
    } else {
        ThreatClass::Other
    }
}
