use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A normalized bounding box (0.0 to 1.0) expressed as opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// X coordinate of the top-left corner (0.0 = left, 1.0 = right)
    pub x1: f64,
    /// Y coordinate of the top-left corner (0.0 = top, 1.0 = bottom)
    pub y1: f64,
    /// X coordinate of the bottom-right corner
    pub x2: f64,
    /// Y coordinate of the bottom-right corner
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from opposite corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Check if the box is valid: within [0, 1] and properly ordered.
    pub fn is_valid(&self) -> bool {
        self.x1 >= 0.0
            && self.y1 >= 0.0
            && self.x1 <= self.x2
            && self.y1 <= self.y2
            && self.x2 <= 1.001 // Allow small epsilon for float precision
            && self.y2 <= 1.001
    }

    /// Box width as a fraction of frame width.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Box height as a fraction of frame height.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Vertical center, used for posture classification.
    pub fn center_y(&self) -> f64 {
        (self.y1 + self.y2) / 2.0
    }

    /// Normalized area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}
