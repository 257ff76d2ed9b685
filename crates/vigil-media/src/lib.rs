//! Frame decoding and self-contained fire detection.
//!
//! The fire segmenter runs entirely on pixel data (no network call): it
//! masks bright red/orange/yellow regions in HSV space, cleans the mask
//! morphologically, and reports the largest connected region when it is
//! large enough to plausibly be flame.

pub mod error;
pub mod fire;

pub use error::{MediaError, MediaResult};
pub use fire::{FireSegmenter, FireSegmenterConfig};

use image::RgbImage;

/// Decode encoded image bytes (JPEG/PNG/…) into an RGB frame.
pub fn decode_frame(bytes: &[u8]) -> MediaResult<RgbImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}
