//! Application configuration
//!
//! Orchestration settings stored in TOML format. The zone catalog itself
//! lives in its own JSON file; everything here configures the service
//! around the pipeline.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP endpoint settings
    pub server: ServerConfig,
    /// Extraction pipeline settings
    pub pipeline: PipelineConfig,
    /// OCR engine settings
    pub ocr: OcrConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pipeline: PipelineConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

/// HTTP upload endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub bind_addr: String,
    /// Listen port
    pub port: u16,
    /// Directory for persisted uploads
    pub upload_dir: PathBuf,
    /// Keep a sanitized copy of each uploaded image
    pub persist_uploads: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            persist_uploads: false,
        }
    }
}

/// Extraction pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Zone catalog path, re-read on every request
    pub zones_file: PathBuf,
    /// Write each binarized ROI to the debug directory
    pub dump_rois: bool,
    /// Directory for ROI dumps
    pub debug_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            zones_file: PathBuf::from("zones.json"),
            dump_rois: false,
            debug_dir: PathBuf::from("uploads"),
        }
    }
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract executable
    pub binary: PathBuf,
    /// Page segmentation mode passed to tesseract
    pub psm: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            psm: 10,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Default configuration file location for this user
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "idscan", "idscan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(!config.server.persist_uploads);

        assert_eq!(config.pipeline.zones_file, PathBuf::from("zones.json"));
        assert!(!config.pipeline.dump_rois);

        assert_eq!(config.ocr.binary, PathBuf::from("tesseract"));
        assert_eq!(config.ocr.psm, 10);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.server.port, parsed.server.port);
        assert_eq!(config.pipeline.zones_file, parsed.pipeline.zones_file);
        assert_eq!(config.ocr.psm, parsed.ocr.psm);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.server.port = 8080;
        config.pipeline.zones_file = PathBuf::from("cards/cin.json");
        config.ocr.psm = 7;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.pipeline.zones_file, PathBuf::from("cards/cin.json"));
        assert_eq!(parsed.ocr.psm, 7);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
