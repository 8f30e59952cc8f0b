//! Region extraction and binarization
//!
//! Slices one zone's rectangle out of the canonical image and reduces it to
//! a two-level black/white image with a global Otsu threshold, which strips
//! background gradients before the text reaches the OCR engine.

use image::imageops;
use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use tracing::debug;

use crate::error::ExtractError;
use crate::zones::Zone;

/// Validate a zone against the canonical image and produce its binarized ROI.
///
/// The rectangle is half-open: `x2`/`y2` are excluded, so a zone spanning
/// the full canvas has `x2 == width` and `y2 == height`.
pub fn extract_roi(canonical: &GrayImage, zone: &Zone) -> Result<GrayImage, ExtractError> {
    let (width, height) = canonical.dimensions();

    if zone.x1 < 0 || zone.y1 < 0 || zone.x2 > width as i32 || zone.y2 > height as i32 {
        return Err(ExtractError::ZoneOutOfBounds(zone.label.clone()));
    }

    let roi_width = zone.x2.saturating_sub(zone.x1).max(0) as u32;
    let roi_height = zone.y2.saturating_sub(zone.y1).max(0) as u32;
    if roi_width == 0 || roi_height == 0 {
        return Err(ExtractError::EmptyRegion(zone.label.clone()));
    }

    let roi = imageops::crop_imm(
        canonical,
        zone.x1 as u32,
        zone.y1 as u32,
        roi_width,
        roi_height,
    )
    .to_image();

    let level = otsu_level(&roi);
    debug!(
        "Zone '{}': {}x{} ROI at ({}, {}), otsu level {}",
        zone.label, roi_width, roi_height, zone.x1, zone.y1, level
    );

    Ok(threshold(&roi, level, ThresholdType::Binary))
}
