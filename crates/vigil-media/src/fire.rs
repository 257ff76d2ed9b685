//! Color-based fire segmentation.
//!
//! Detects flame by masking bright red/orange/yellow pixels in HSV space.
//! Hue is kept on the 0-180 scale so the band constants stay comparable to
//! the tuning they were calibrated with. Saturation and brightness floors
//! reject skin tones and dull warm surfaces.

use image::RgbImage;
use tracing::debug;

use vigil_models::{BoundingBox, FireColorSignal};

/// Tunable floors for the segmenter. Defaults are calibrated for small
/// flames (a lighter at a few meters) while staying above speckle noise.
#[derive(Debug, Clone)]
pub struct FireSegmenterConfig {
    /// Minimum masked pixels before a frame is considered at all.
    pub min_pixels: u32,
    /// Minimum masked fraction of the frame, in percent.
    pub min_frame_percent: f64,
    /// Minimum pixel area of the largest connected region.
    pub min_region_area: u32,
    /// Minimum width/height of the region's bounding rectangle, in pixels.
    pub min_region_dim: u32,
    /// Minimum saturation (0-255) for a pixel to count as flame-colored.
    pub min_saturation: u8,
    /// Minimum brightness (0-255) for a pixel to count as flame-colored.
    pub min_value: u8,
}

impl Default for FireSegmenterConfig {
    fn default() -> Self {
        Self {
            min_pixels: 150,
            min_frame_percent: 0.3,
            min_region_area: 300,
            min_region_dim: 20,
            min_saturation: 120,
            min_value: 180,
        }
    }
}

/// Color-based fire segmenter.
///
/// Returning `None` is the normal "no flame in frame" outcome, not an error.
#[derive(Debug, Clone, Default)]
pub struct FireSegmenter {
    config: FireSegmenterConfig,
}

impl FireSegmenter {
    pub fn new(config: FireSegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FireSegmenterConfig {
        &self.config
    }

    /// Segment one RGB frame.
    pub fn segment(&self, frame: &RgbImage) -> Option<FireColorSignal> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let mut mask = self.flame_mask(frame);

        // Close then open with a 5x5 kernel to fill pinholes and drop speckle.
        morph_close(&mut mask, width as usize, height as usize, 2);
        morph_open(&mut mask, width as usize, height as usize, 2);

        let masked = mask.iter().filter(|&&m| m).count() as u32;
        let total = width as u64 * height as u64;
        let frame_percent = (masked as f64 / total as f64) * 100.0;

        if masked < self.config.min_pixels || frame_percent < self.config.min_frame_percent {
            return None;
        }

        let region = largest_region(&mask, width as usize, height as usize)?;

        if region.area < self.config.min_region_area {
            debug!(area = region.area, "flame-colored region below area floor");
            return None;
        }
        let rect_w = region.max_x - region.min_x + 1;
        let rect_h = region.max_y - region.min_y + 1;
        if rect_w < self.config.min_region_dim as usize || rect_h < self.config.min_region_dim as usize
        {
            debug!(rect_w, rect_h, "flame-colored region below size floor");
            return None;
        }

        let bbox = BoundingBox::new(
            region.min_x as f64 / width as f64,
            region.min_y as f64 / height as f64,
            (region.max_x + 1) as f64 / width as f64,
            (region.max_y + 1) as f64 / height as f64,
        );

        Some(FireColorSignal {
            frame_percent,
            score: (frame_percent / 100.0).min(0.95),
            bbox,
        })
    }

    /// Binary mask of flame-colored pixels: the union of three hue bands
    /// (red, orange, yellow), each gated by saturation and brightness.
    fn flame_mask(&self, frame: &RgbImage) -> Vec<bool> {
        let (width, height) = frame.dimensions();
        let mut mask = vec![false; width as usize * height as usize];

        for (i, pixel) in frame.pixels().enumerate() {
            let [r, g, b] = pixel.0;
            let (h, s, v) = rgb_to_hsv(r, g, b);
            if s < self.config.min_saturation || v < self.config.min_value {
                continue;
            }
            // Hue on the 0-180 scale: red wraps around both ends.
            let red = h <= 10 || h >= 170;
            let orange = h > 10 && h <= 25;
            let yellow = h > 25 && h <= 35;
            mask[i] = red || orange || yellow;
        }

        mask
    }
}

/// RGB to HSV with hue on 0-180 and saturation/value on 0-255.
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f64;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        ((delta * 255.0) / max as f64).round() as u8
    };

    if delta == 0.0 {
        return (0, s, v);
    }

    let hue_deg = if max == r {
        60.0 * (((g as f64 - b as f64) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b as f64 - r as f64) / delta + 2.0)
    } else {
        60.0 * ((r as f64 - g as f64) / delta + 4.0)
    };

    ((hue_deg / 2.0).round().min(180.0) as u8, s, v)
}

fn dilate(mask: &[bool], width: usize, height: usize, radius: usize) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    for y in 0..height {
        for x in 0..width {
            'window: for dy in y.saturating_sub(radius)..=(y + radius).min(height - 1) {
                for dx in x.saturating_sub(radius)..=(x + radius).min(width - 1) {
                    if mask[dy * width + dx] {
                        out[y * width + x] = true;
                        break 'window;
                    }
                }
            }
        }
    }
    out
}

fn erode(mask: &[bool], width: usize, height: usize, radius: usize) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    for y in 0..height {
        for x in 0..width {
            if y < radius || x < radius || y + radius >= height || x + radius >= width {
                continue;
            }
            let mut keep = true;
            'window: for dy in y - radius..=y + radius {
                for dx in x - radius..=x + radius {
                    if !mask[dy * width + dx] {
                        keep = false;
                        break 'window;
                    }
                }
            }
            out[y * width + x] = keep;
        }
    }
    out
}

fn morph_close(mask: &mut Vec<bool>, width: usize, height: usize, radius: usize) {
    let dilated = dilate(mask, width, height, radius);
    *mask = erode(&dilated, width, height, radius);
}

fn morph_open(mask: &mut Vec<bool>, width: usize, height: usize, radius: usize) {
    let eroded = erode(mask, width, height, radius);
    *mask = dilate(&eroded, width, height, radius);
}

struct Region {
    area: u32,
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

/// Largest 8-connected region of the mask, or `None` for an empty mask.
fn largest_region(mask: &[bool], width: usize, height: usize) -> Option<Region> {
    let mut visited = vec![false; mask.len()];
    let mut best: Option<Region> = None;
    let mut stack = Vec::new();

    for start in 0..mask.len() {
        if !mask[start] || visited[start] {
            continue;
        }

        let mut region = Region {
            area: 0,
            min_x: usize::MAX,
            min_y: usize::MAX,
            max_x: 0,
            max_y: 0,
        };

        visited[start] = true;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % width, idx / width);
            region.area += 1;
            region.min_x = region.min_x.min(x);
            region.min_y = region.min_y.min(y);
            region.max_x = region.max_x.max(x);
            region.max_y = region.max_y.max(y);

            for dy in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                for dx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    let nidx = dy * width + dx;
                    if mask[nidx] && !visited[nidx] {
                        visited[nidx] = true;
                        stack.push(nidx);
                    }
                }
            }
        }

        if best.as_ref().map_or(true, |b| region.area > b.area) {
            best = Some(region);
        }
    }

    best
}
