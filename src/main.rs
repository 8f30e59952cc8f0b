//! idscan - zone-based ID document field extraction
//!
//! Applies a calibrated zone catalog to a card photo and runs per-field OCR,
//! either as a one-shot command-line extraction or as an HTTP upload service.

mod config;
mod error;
mod ocr;
mod pipeline;
mod server;
mod zones;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::pipeline::ExtractionPipeline;

/// idscan - calibrated-zone OCR for ID documents
#[derive(Parser, Debug)]
#[command(name = "idscan")]
#[command(about = "Extract labeled text fields from an ID document photo")]
struct Args {
    /// Image to extract fields from (one-shot mode)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Zone catalog file (overrides the configured path)
    #[arg(short, long)]
    zones: Option<PathBuf>,

    /// Run the HTTP upload service instead of a one-shot extraction
    #[arg(long)]
    serve: bool,

    /// Listen port for the HTTP service (overrides the configured port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write each binarized ROI to the debug directory for calibration checks
    #[arg(long)]
    dump_rois: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = load_or_default_config(args.config.as_deref())?;

    if let Some(zones_file) = args.zones {
        config.pipeline.zones_file = zones_file;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.dump_rois {
        config.pipeline.dump_rois = true;
    }

    if args.serve {
        server::serve(config).await
    } else {
        let Some(image_path) = args.image else {
            bail!("either --image or --serve is required");
        };
        extract_once(&config, &image_path)
    }
}

/// One-shot mode: run the pipeline on a single file and print the mapping
fn extract_once(config: &AppConfig, image_path: &std::path::Path) -> Result<()> {
    let bytes = std::fs::read(image_path)
        .with_context(|| format!("failed to read image {:?}", image_path))?;
    let catalog = zones::load_zones(&config.pipeline.zones_file)?;

    info!("Extracting {} zones from {:?}", catalog.len(), image_path);

    let pipeline = ExtractionPipeline::from_config(config);
    let fields = pipeline.extract_all(&bytes, &catalog)?;

    println!("{}", serde_json::to_string_pretty(&fields)?);

    Ok(())
}

/// Load configuration from the given path, the default location, or defaults
fn load_or_default_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return config::load_config(path)
            .with_context(|| format!("failed to load config {:?}", path));
    }

    if let Ok(default_path) = config::default_config_path() {
        if default_path.exists() {
            if let Ok(config) = config::load_config(&default_path) {
                info!("Loaded configuration from {:?}", default_path);
                return Ok(config);
            }
        }
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}
