//! HTTP upload endpoint
//!
//! Thin axum layer over the extraction pipeline: multipart image upload in,
//! ordered field-name -> text JSON object out. The zone catalog is re-read
//! on every request, so calibration updates apply without a restart.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use indexmap::IndexMap;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::pipeline::ExtractionPipeline;
use crate::zones;

/// Upload cap; card photos are small
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared state for the extraction routes
pub struct AppState {
    config: AppConfig,
    pipeline: ExtractionPipeline,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let pipeline = ExtractionPipeline::from_config(&config);
        Self { config, pipeline }
    }
}

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/extract", post(extract_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the upload service until the process is stopped
pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let state = Arc::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("server error")?;

    Ok(())
}

/// POST /v1/extract - extract catalog fields from an uploaded card photo.
///
/// Expects a multipart form with an `image` part. Responds with the ordered
/// label -> text JSON object, or `{"error": ...}` with a 4xx/5xx status.
async fn extract_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<IndexMap<String, String>>, Response> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(&format!("failed to read upload: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(bad_request("no image part in request"));
    };
    if bytes.is_empty() {
        return Err(bad_request("uploaded image is empty"));
    }

    info!("Received upload '{}' ({} bytes)", filename, bytes.len());

    if state.config.server.persist_uploads {
        persist_upload(&state.config, &filename, &bytes);
    }

    // The pipeline shells out to tesseract; keep it off the async workers.
    let worker_state = state.clone();
    let fields = tokio::task::spawn_blocking(move || {
        let catalog = zones::load_zones(&worker_state.config.pipeline.zones_file)?;
        worker_state.pipeline.extract_all(&bytes, &catalog)
    })
    .await
    .map_err(|e| internal_error(&format!("extraction task failed: {e}")))?
    .map_err(|e| error_response(&e))?;

    Ok(Json(fields))
}

/// Write a sanitized copy of the upload; failures are logged, never fatal
fn persist_upload(config: &AppConfig, filename: &str, bytes: &[u8]) {
    let dir = &config.server.upload_dir;
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!("Failed to create upload dir {:?}: {}", dir, e);
        return;
    }
    let path = dir.join(sanitize_filename(filename));
    match std::fs::write(&path, bytes) {
        Ok(()) => info!("Stored upload at {:?}", path),
        Err(e) => warn!("Failed to store upload at {:?}: {}", path, e),
    }
}

/// Strip path components and unsafe characters from an uploaded filename
fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.' || c == '_') {
        "upload".to_string()
    } else {
        cleaned
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

/// Map a pipeline error onto an HTTP response.
///
/// Bad uploads are the caller's fault; catalog and zone problems are
/// server-side configuration issues.
fn error_response(err: &ExtractError) -> Response {
    let status = match err {
        ExtractError::InvalidImage(_) => StatusCode::BAD_REQUEST,
        ExtractError::CatalogNotFound(_)
        | ExtractError::CatalogMalformed(_)
        | ExtractError::ZoneOutOfBounds(_)
        | ExtractError::EmptyRegion(_)
        | ExtractError::RecognitionFailed(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
