//! Extraction error taxonomy
//!
//! Every failure in the zone pipeline is terminal for the current request:
//! no retries, no partial results. Variants carry the offending zone label
//! where one exists so callers can report which field broke.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the extraction pipeline
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The zone-definition file does not exist
    #[error("zone catalog not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    /// The zone-definition file exists but is not a valid catalog
    #[error("zone catalog is malformed: {0}")]
    CatalogMalformed(String),

    /// The input bytes could not be decoded into a non-empty image
    #[error("invalid input image: {0}")]
    InvalidImage(String),

    /// A zone's rectangle lies outside the canonical image
    #[error("zone '{0}' is out of bounds for the canonical image")]
    ZoneOutOfBounds(String),

    /// A zone's rectangle has zero area
    #[error("zone '{0}' selects an empty region")]
    EmptyRegion(String),

    /// The OCR engine failed internally
    #[error("recognition failed for zone '{0}': {1}")]
    RecognitionFailed(String, String),
}
