use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::fmt::Write;
use tracing::{debug, info};

use super::{error::ApiError, pages, state::AppState};
use crate::storage::{self, PathError, ResolvedPath};

#[derive(Debug, Deserialize)]
pub struct SnapQuery {
    pub camera: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    pub file: Option<String>,
}

/// Static index document (GET /)
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = &state.config.server.index_file;

    let body = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::IndexNotFound(format!("{}: {}", path.display(), e)))?;

    Ok(([(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref())], body).into_response())
}

/// Registered cameras as `name id` lines (GET /cameras)
pub async fn list_cameras(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = String::new();
    for (name, id) in state.registry.list_all() {
        let _ = writeln!(body, "{} {}", name, id);
    }
    body
}

/// Trigger one capture (GET /snap?camera=<name>)
///
/// Unknown names are rejected before the fetcher is touched.
pub async fn snap(
    State(state): State<AppState>,
    Query(query): Query<SnapQuery>,
) -> Result<String, ApiError> {
    let requested = query.camera.unwrap_or_default();
    let camera_id = state
        .registry
        .resolve_id(&requested)
        .cloned()
        .ok_or_else(|| ApiError::UnknownCamera(requested.clone()))?;

    info!(camera = %requested, %camera_id, "Snapshot requested");

    match state.fetcher.capture(&camera_id).await {
        Ok(stored) => {
            state.metrics.snapshot_captured();
            debug!(path = %stored.path.display(), size = stored.size_bytes, "Snapshot captured");
            Ok(format!("camera {}", camera_id))
        }
        Err(e) => {
            state.metrics.snapshot_failed();
            Err(ApiError::SnapshotFailed {
                camera_id: camera_id.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Camera index for the file browser (GET /files)
pub async fn files_index(State(state): State<AppState>) -> Html<String> {
    Html(pages::camera_index(&state.registry.list_all()))
}

/// Directory listing or image download (GET /files/{camera}[?file=<name>])
pub async fn camera_files(
    State(state): State<AppState>,
    Path(camera): Path<String>,
    Query(query): Query<FilesQuery>,
) -> Result<Response, ApiError> {
    let camera_dir = state.resolver.resolve(&camera, None)?;

    match query.file.as_deref() {
        None => list_camera(&state, &camera_dir).await,
        Some("") => Err(ApiError::NoImageSpecified),
        Some(file) => serve_image(&state, &camera, file).await,
    }
}

async fn list_camera(state: &AppState, camera_dir: &ResolvedPath) -> Result<Response, ApiError> {
    let entries = storage::list_directory(camera_dir).await?;

    let camera_name = state
        .registry
        .resolve_name(&camera_dir.camera_id)
        .unwrap_or(camera_dir.camera_id.as_str());

    Ok(Html(pages::file_listing(camera_name, &camera_dir.camera_id, &entries)).into_response())
}

async fn serve_image(state: &AppState, camera: &str, file: &str) -> Result<Response, ApiError> {
    let reject = |e: PathError| {
        if matches!(e, PathError::InvalidPath(_)) {
            state.metrics.path_rejected();
        }
        ApiError::from(e)
    };

    let resolved = state.resolver.resolve(camera, Some(file)).map_err(reject)?;
    let path = state
        .resolver
        .ensure_contained(&resolved)
        .await
        .map_err(reject)?;

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !metadata.is_file() {
        return Err(ApiError::ImageNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    state.metrics.file_served();
    debug!(
        camera_id = %resolved.camera_id,
        path = %path.display(),
        size = bytes.len(),
        "Serving image"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::IMAGE_JPEG.as_ref())],
        bytes,
    )
        .into_response())
}

/// Liveness check (GET /health)
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
