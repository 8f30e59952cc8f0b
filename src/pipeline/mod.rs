//! Zone extraction pipeline
//!
//! Composes normalization, region extraction and OCR dispatch into the
//! end-to-end mapping from an uploaded image to field text. Processing is
//! sequential in catalog order and fail-fast: the first zone that cannot be
//! validated or recognized aborts the whole request with no partial result.

pub mod normalize;
pub mod roi;

use std::path::PathBuf;

use image::GrayImage;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::ocr::{self, OcrEngine, TesseractEngine};
use crate::zones::Zone;

pub use normalize::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Observer for binarized ROIs, keyed by zone label.
///
/// Purely diagnostic: implementations may persist the images for calibration
/// debugging. Sink failures are logged and never affect extraction.
pub trait RoiSink: Send + Sync {
    fn record(&self, label: &str, roi: &GrayImage);
}

/// Sink that drops everything
pub struct NoopSink;

impl RoiSink for NoopSink {
    fn record(&self, _label: &str, _roi: &GrayImage) {}
}

/// Sink that writes each ROI as `debug_<label>_roi.png` under a directory
pub struct DebugDumpSink {
    dir: PathBuf,
}

impl DebugDumpSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RoiSink for DebugDumpSink {
    fn record(&self, label: &str, roi: &GrayImage) {
        let path = self.dir.join(format!("debug_{label}_roi.png"));
        if let Err(e) = roi.save(&path) {
            warn!("Failed to write ROI dump {:?}: {}", path, e);
        }
    }
}

/// End-to-end extraction pipeline over a fixed OCR engine
pub struct ExtractionPipeline {
    engine: Box<dyn OcrEngine>,
    sink: Box<dyn RoiSink>,
}

impl ExtractionPipeline {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self {
            engine,
            sink: Box::new(NoopSink),
        }
    }

    /// Attach a diagnostic ROI sink
    pub fn with_sink(mut self, sink: Box<dyn RoiSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the production pipeline from configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let engine = TesseractEngine::with_binary(&config.ocr.binary).with_psm(config.ocr.psm);
        let pipeline = Self::new(Box::new(engine));
        if config.pipeline.dump_rois {
            pipeline.with_sink(Box::new(DebugDumpSink::new(&config.pipeline.debug_dir)))
        } else {
            pipeline
        }
    }

    /// Extract every catalog field from the raw image bytes.
    ///
    /// The result maps zone labels to trimmed recognized text, in catalog
    /// order. Any zone failure aborts the request.
    pub fn extract_all(
        &self,
        image_bytes: &[u8],
        zones: &[Zone],
    ) -> Result<IndexMap<String, String>, ExtractError> {
        let canonical = normalize::normalize(image_bytes)?;

        let mut fields = IndexMap::with_capacity(zones.len());
        for zone in zones {
            let binarized = roi::extract_roi(&canonical, zone)?;
            self.sink.record(&zone.label, &binarized);
            let text = ocr::recognize_zone(self.engine.as_ref(), &binarized, zone)?;
            fields.insert(zone.label.clone(), text);
        }

        info!("Extracted {} fields", fields.len());

        Ok(fields)
    }
}
