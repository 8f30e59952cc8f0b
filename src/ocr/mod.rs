//! OCR dispatch
//!
//! Recognition is an external capability behind the [`OcrEngine`] trait:
//! given a binarized single-channel ROI and a script hint, produce text.
//! The dispatcher picks the script per zone and trims the result; an empty
//! string is a valid outcome for a blank region.

pub mod tesseract;

use anyhow::Result;
use image::GrayImage;
use tracing::debug;

use crate::error::ExtractError;
use crate::zones::{Script, Zone};

pub use tesseract::TesseractEngine;

/// A text recognition capability.
///
/// Implementations receive an isolated, binarized region containing at most
/// one token of text and must not perform page layout analysis.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in `roi` using the given script
    fn recognize(&self, roi: &GrayImage, script: Script) -> Result<String>;
}

/// Run recognition for one zone and normalize the result.
///
/// Engine failures surface as [`ExtractError::RecognitionFailed`] carrying
/// the zone label.
pub fn recognize_zone(
    engine: &dyn OcrEngine,
    roi: &GrayImage,
    zone: &Zone,
) -> Result<String, ExtractError> {
    let script = zone.script();

    let text = engine
        .recognize(roi, script)
        .map_err(|e| ExtractError::RecognitionFailed(zone.label.clone(), e.to_string()))?;

    let text = text.trim().to_string();
    debug!("Zone '{}' ({:?}): {:?}", zone.label, script, text);

    Ok(text)
}
