use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::storage::{ListError, PathError};

/// Every failure a route can produce
///
/// The `Display` text carries detail for the log; clients only ever see
/// [`ApiError::public_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown camera: {0:?}")]
    UnknownCamera(String),
    #[error("camera not found: {0}")]
    CameraNotFound(String),
    #[error("camera output directory missing: {0}")]
    OutputDirMissing(String),
    #[error("no image specified")]
    NoImageSpecified,
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("image not found: {0}")]
    ImageNotFound(String),
    #[error("index file unavailable: {0}")]
    IndexNotFound(String),
    #[error("snapshot of camera {camera_id} failed: {reason}")]
    SnapshotFailed { camera_id: String, reason: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // `/snap` answers an unknown name in-band
            ApiError::UnknownCamera(_) => StatusCode::OK,
            ApiError::CameraNotFound(_)
            | ApiError::OutputDirMissing(_)
            | ApiError::ImageNotFound(_)
            | ApiError::IndexNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoImageSpecified | ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::SnapshotFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnknownCamera(_) => "UNKNOWN_CAMERA",
            ApiError::CameraNotFound(_) => "CAMERA_NOT_FOUND",
            ApiError::OutputDirMissing(_) => "OUTPUT_DIR_MISSING",
            ApiError::NoImageSpecified => "NO_IMAGE_SPECIFIED",
            ApiError::InvalidPath(_) => "INVALID_PATH",
            ApiError::ImageNotFound(_) => "IMAGE_NOT_FOUND",
            ApiError::IndexNotFound(_) => "INDEX_NOT_FOUND",
            ApiError::SnapshotFailed { .. } => "SNAPSHOT_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            ApiError::UnknownCamera(_) => "unknown camera".to_string(),
            ApiError::CameraNotFound(_) => "camera not found".to_string(),
            ApiError::OutputDirMissing(_) => "Camera output directory doesnt exist".to_string(),
            ApiError::NoImageSpecified => "no image specified".to_string(),
            ApiError::InvalidPath(_) => "invalid file".to_string(),
            ApiError::ImageNotFound(_) => "image not found".to_string(),
            ApiError::IndexNotFound(_) => "404 page not found".to_string(),
            ApiError::SnapshotFailed { camera_id, .. } => {
                format!("camera {}: snapshot failed", camera_id)
            }
            ApiError::Internal(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        } else {
            warn!(code = self.code(), error = %self, "Request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
            self.public_message(),
        )
            .into_response()
    }
}

impl From<PathError> for ApiError {
    fn from(value: PathError) -> Self {
        match value {
            PathError::CameraNotFound(name) => ApiError::CameraNotFound(name),
            PathError::InvalidPath(detail) => ApiError::InvalidPath(detail),
            PathError::FileNotFound(path) => ApiError::ImageNotFound(path.display().to_string()),
            PathError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ListError> for ApiError {
    fn from(value: ListError) -> Self {
        match value {
            ListError::NotFound(path) => ApiError::OutputDirMissing(path.display().to_string()),
            ListError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}
