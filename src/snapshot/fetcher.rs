use async_trait::async_trait;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use super::clock::TimeSource;
use super::http::{DownloadError, HttpClient, HttpConfig};
use crate::cameras::CameraId;
use crate::config::BackendConfig;

/// `strftime` pattern for snapshot file names (second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    #[error("snapshot too large: {actual} bytes (limit {limit})")]
    TooLarge { actual: u64, limit: u64 },

    #[error("failed to store snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl From<DownloadError> for FetchError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::TooLarge { actual, limit } => FetchError::TooLarge { actual, limit },
            other => FetchError::Upstream(other.to_string()),
        }
    }
}

/// Where a captured snapshot landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPath {
    pub camera_id: CameraId,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Captures one image for a camera and stores it on disk
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn capture(&self, camera_id: &CameraId) -> Result<StoredPath, FetchError>;
}

/// Fetches from motionEye's `/picture/<id>/current/` endpoint
///
/// Files are named after the capture time at second precision, so two
/// captures of one camera within the same second overwrite each other.
/// The write goes through a hidden temporary file and a rename, which means
/// the final name only ever holds a complete image.
pub struct MotionEyeFetcher {
    http: HttpClient,
    server_url: Url,
    username: String,
    signature: String,
    output_root: PathBuf,
    clock: Arc<dyn TimeSource>,
}

impl MotionEyeFetcher {
    pub fn new(
        backend: &BackendConfig,
        output_root: impl Into<PathBuf>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, FetchError> {
        let http = HttpClient::new(HttpConfig::from(backend))?;
        let server_url = Url::parse(backend.server_url.trim_end_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", backend.server_url, e)))?;
        if server_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(backend.server_url.clone()));
        }

        Ok(Self {
            http,
            server_url,
            username: backend.username.clone(),
            signature: backend.signature.clone().unwrap_or_default(),
            output_root: output_root.into(),
            clock,
        })
    }

    pub fn snapshot_url(&self, camera_id: &CameraId) -> Url {
        picture_url(&self.server_url, camera_id, &self.username, &self.signature)
    }

    fn redacted_url(&self, camera_id: &CameraId) -> Url {
        picture_url(&self.server_url, camera_id, &self.username, "<redacted>")
    }
}

#[async_trait]
impl SnapshotFetcher for MotionEyeFetcher {
    async fn capture(&self, camera_id: &CameraId) -> Result<StoredPath, FetchError> {
        let requested_at = self.clock.now();
        let log_url = self.redacted_url(camera_id);

        let bytes = self
            .http
            .download(self.snapshot_url(camera_id).as_str(), log_url.as_str())
            .await
            .inspect_err(|e| {
                warn!(%camera_id, url = %log_url, error = %e, "Snapshot download failed")
            })?;

        let dir = self.output_root.join(camera_id.dir_name());
        let file_name = format!("{}.jpg", requested_at.format(TIMESTAMP_FORMAT));
        let path = dir.join(&file_name);

        tokio::fs::create_dir_all(&dir).await?;
        write_atomically(&dir, &file_name, &bytes)
            .await
            .inspect_err(|e| {
                warn!(%camera_id, path = %path.display(), error = %e, "Snapshot write failed")
            })?;

        info!(%camera_id, path = %path.display(), size = bytes.len(), "Snapshot stored");

        Ok(StoredPath {
            camera_id: camera_id.clone(),
            path,
            size_bytes: bytes.len() as u64,
        })
    }
}

/// `<server>/picture/<id>/current/?_username=..&_signature=..`, query values form-encoded
fn picture_url(server_url: &Url, camera_id: &CameraId, username: &str, signature: &str) -> Url {
    let mut url = server_url.clone();
    let base_path = server_url.path().trim_end_matches('/');
    url.set_path(&format!("{}/picture/{}/current/", base_path, camera_id));
    url.query_pairs_mut()
        .clear()
        .append_pair("_username", username)
        .append_pair("_signature", signature);
    url
}

async fn write_atomically(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = dir.join(format!(".{}.{}.part", file_name, Uuid::new_v4().simple()));

    let result = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp_path, dir.join(file_name)).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    result
}
