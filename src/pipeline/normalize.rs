//! Canonical image construction
//!
//! Uploaded photos arrive at arbitrary resolutions; zone coordinates are
//! only meaningful against a fixed canvas. Every input is resized to the
//! canonical ID-1 card canvas, converted to grayscale and
//! histogram-equalized to normalize contrast across lighting and scan
//! conditions.

use image::imageops::FilterType;
use image::GrayImage;
use imageproc::contrast::equalize_histogram;
use tracing::debug;

use crate::error::ExtractError;

/// Canonical canvas width in pixels
pub const CANVAS_WIDTH: u32 = 800;

/// Canonical canvas height: round(CANVAS_WIDTH / 1.586), the ID-1 card aspect
pub const CANVAS_HEIGHT: u32 = 504;

/// Decode raw image bytes and produce the canonical grayscale image.
///
/// Deterministic for fixed input bytes: the resize uses a fixed bilinear
/// filter and the equalization is a pure function of the pixel histogram.
pub fn normalize(bytes: &[u8]) -> Result<GrayImage, ExtractError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ExtractError::InvalidImage(e.to_string()))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ExtractError::InvalidImage("empty pixel buffer".to_string()));
    }

    debug!("Decoded image: {}x{}", decoded.width(), decoded.height());

    let resized = decoded.resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Triangle);
    let gray = resized.to_luma8();

    debug!("Canonical image: {}x{}", gray.width(), gray.height());

    Ok(equalize_histogram(&gray))
}
