//! Wire types and adaptation into the classifier's raw signals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vigil_models::{BoundingBox, LabelSignal, ObjectSignal};

/// One normalized polygon vertex, as returned by the localization service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Wire record from the object-localization service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedObject {
    pub name: String,
    pub score: f64,
    pub vertices: Vec<Vertex>,
}

impl LocalizedObject {
    /// Adapt one wire record, reducing the polygon to a bounding box from
    /// its first and third (opposite) vertices.
    ///
    /// Polygons with fewer than 4 vertices are malformed; the candidate is
    /// dropped and the rest of the response keeps processing.
    pub fn into_signal(self) -> Option<ObjectSignal> {
        if self.vertices.len() < 4 {
            debug!(
                label = %self.name,
                vertices = self.vertices.len(),
                "dropping localization with malformed polygon"
            );
            return None;
        }
        let (tl, br) = (self.vertices[0], self.vertices[2]);
        Some(ObjectSignal::new(
            self.name,
            self.score,
            BoundingBox::new(tl.x, tl.y, br.x, br.y),
        ))
    }
}

/// Wire record from the scene-label service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLabel {
    pub description: String,
    pub score: f64,
}

impl SceneLabel {
    pub fn into_signal(self) -> LabelSignal {
        LabelSignal::new(self.description, self.score)
    }
}
