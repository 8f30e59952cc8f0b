//! Tesseract engine
//!
//! Invokes the `tesseract` executable directly: the ROI is written to a
//! temporary PNG and recognized in single-token segmentation mode with the
//! language pack matching the requested script. Tesseract is a runtime
//! requirement only; nothing links against it.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use image::GrayImage;

use super::OcrEngine;
use crate::zones::Script;

/// Default page segmentation mode: treat the ROI as a single token
const SINGLE_TOKEN_PSM: u8 = 10;

/// OCR engine backed by the system `tesseract` executable
pub struct TesseractEngine {
    binary: PathBuf,
    psm: u8,
}

impl TesseractEngine {
    /// Engine using `tesseract` from `PATH`
    pub fn new() -> Self {
        Self::with_binary("tesseract")
    }

    /// Engine using a specific tesseract executable
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            psm: SINGLE_TOKEN_PSM,
        }
    }

    /// Override the page segmentation mode
    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }

    /// Tesseract language pack for a script hint
    fn language(script: Script) -> &'static str {
        match script {
            Script::Latin => "eng",
            Script::Arabic => "ara",
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, roi: &GrayImage, script: Script) -> Result<String> {
        let mut tmp = tempfile::Builder::new()
            .prefix("idscan-roi-")
            .suffix(".png")
            .tempfile()
            .context("failed to create temp file for OCR handoff")?;
        roi.write_to(&mut tmp, image::ImageFormat::Png)
            .context("failed to encode ROI as PNG")?;
        tmp.flush().ok();

        let output = Command::new(&self.binary)
            .arg(tmp.path())
            .arg("stdout")
            .arg("-l")
            .arg(Self::language(script))
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .context("failed to run tesseract (is it installed?)")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("tesseract failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
