//! Zone catalog loading
//!
//! A catalog is a JSON array of named rectangles drawn against the canonical
//! card image. The calibration tool that produces the file is external; this
//! module only loads the result and checks label hygiene. Coordinates are
//! validated later, against the actual canonical image.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractError;

/// Script requested from the OCR engine for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Latin,
    Arabic,
}

impl Script {
    /// Legacy naming convention: labels ending in `_AR` are Arabic fields
    pub fn from_label(label: &str) -> Self {
        if label.ends_with("_AR") {
            Script::Arabic
        } else {
            Script::Latin
        }
    }
}

/// One named rectangular region in canonical image coordinates.
///
/// `x1, y1` is the top-left corner, `x2, y2` the exclusive bottom-right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Field identifier, unique within a catalog
    pub label: String,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Explicit script override; derived from the label suffix when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Script>,
}

impl Zone {
    /// Script to request for this field
    pub fn script(&self) -> Script {
        self.script.unwrap_or_else(|| Script::from_label(&self.label))
    }
}

/// Load a zone catalog from a JSON file.
///
/// Catalog order is preserved and extraction results follow it. Duplicate or
/// empty labels are rejected here rather than silently overwriting each
/// other in the result mapping.
pub fn load_zones(path: &Path) -> Result<Vec<Zone>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::CatalogNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ExtractError::CatalogMalformed(e.to_string()))?;

    let zones: Vec<Zone> = serde_json::from_str(&content)
        .map_err(|e| ExtractError::CatalogMalformed(e.to_string()))?;

    let mut seen = HashSet::new();
    for zone in &zones {
        if zone.label.is_empty() {
            return Err(ExtractError::CatalogMalformed(
                "zone with an empty label".to_string(),
            ));
        }
        if !seen.insert(zone.label.as_str()) {
            return Err(ExtractError::CatalogMalformed(format!(
                "duplicate zone label '{}'",
                zone.label
            )));
        }
    }

    debug!("Loaded {} zones from {:?}", zones.len(), path);

    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_catalog(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_catalog_preserves_order() {
        let file = write_catalog(
            r#"[
                {"label": "NAME", "x1": 10, "y1": 10, "x2": 200, "y2": 60},
                {"label": "ID_AR", "x1": 10, "y1": 70, "x2": 200, "y2": 120}
            ]"#,
        );

        let zones = load_zones(file.path()).unwrap();

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].label, "NAME");
        assert_eq!(zones[1].label, "ID_AR");
        assert_eq!(zones[1].y1, 70);
        assert_eq!(zones[1].y2, 120);
    }

    #[test]
    fn test_missing_file_is_catalog_not_found() {
        let err = load_zones(Path::new("/nonexistent/zones.json")).unwrap_err();
        assert!(matches!(err, ExtractError::CatalogNotFound(_)));
    }

    #[test]
    fn test_non_array_document_is_malformed() {
        let file = write_catalog(r#"{"label": "NAME", "x1": 0, "y1": 0, "x2": 1, "y2": 1}"#);
        let err = load_zones(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::CatalogMalformed(_)));
    }

    #[test]
    fn test_missing_attribute_is_malformed() {
        let file = write_catalog(r#"[{"label": "NAME", "x1": 10, "y1": 10, "x2": 200}]"#);
        let err = load_zones(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::CatalogMalformed(_)));
    }

    #[test]
    fn test_duplicate_label_is_malformed() {
        let file = write_catalog(
            r#"[
                {"label": "NAME", "x1": 10, "y1": 10, "x2": 200, "y2": 60},
                {"label": "NAME", "x1": 10, "y1": 70, "x2": 200, "y2": 120}
            ]"#,
        );

        let err = load_zones(file.path()).unwrap_err();
        match err {
            ExtractError::CatalogMalformed(msg) => assert!(msg.contains("NAME")),
            other => panic!("expected CatalogMalformed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_label_is_malformed() {
        let file = write_catalog(r#"[{"label": "", "x1": 0, "y1": 0, "x2": 10, "y2": 10}]"#);
        let err = load_zones(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::CatalogMalformed(_)));
    }

    #[test]
    fn test_script_follows_label_suffix() {
        assert_eq!(Script::from_label("ID_AR"), Script::Arabic);
        assert_eq!(Script::from_label("NAME"), Script::Latin);
        // The bare suffix without the separator is not Arabic
        assert_eq!(Script::from_label("AR"), Script::Latin);
    }

    #[test]
    fn test_explicit_script_wins_over_suffix() {
        let zone: Zone = serde_json::from_str(
            r#"{"label": "NOTES_AR", "x1": 0, "y1": 0, "x2": 10, "y2": 10, "script": "latin"}"#,
        )
        .unwrap();

        assert_eq!(zone.script(), Script::Latin);
    }

    #[test]
    fn test_suffix_convention_applies_without_explicit_script() {
        let zone: Zone = serde_json::from_str(
            r#"{"label": "CITY_AR", "x1": 0, "y1": 0, "x2": 10, "y2": 10}"#,
        )
        .unwrap();

        assert_eq!(zone.script(), Script::Arabic);
    }
}
