//! HTTP client for the backend picture endpoint

use bytes::{Bytes, BytesMut};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::BackendConfig;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Response body exceeds limit of {limit} bytes ({actual} bytes received)")]
    TooLarge { actual: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, DownloadError>;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 20 * 1000 * 1000,
            user_agent: concat!("camgate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl From<&BackendConfig> for HttpConfig {
    fn from(backend: &BackendConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(backend.connect_timeout_secs),
            request_timeout: Duration::from_secs(backend.request_timeout_secs),
            max_body_bytes: backend.max_snapshot_bytes.as_u64(),
            ..Self::default()
        }
    }
}

/// Single-shot downloader; failures are returned, never retried
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// `log_url` is what gets logged; pass a redacted form of `url`.
    pub async fn download(&self, url: &str, log_url: &str) -> Result<Bytes> {
        debug!(url = log_url, "Starting download");

        let mut response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let limit = self.config.max_body_bytes;
        if let Some(length) = response.content_length() {
            if length > limit {
                return Err(DownloadError::TooLarge {
                    actual: length,
                    limit,
                });
            }
        }

        // Chunked responses carry no length up front, so the cap is enforced
        // while reading and the body never grows past `limit`.
        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            let received = (body.len() + chunk.len()) as u64;
            if received > limit {
                return Err(DownloadError::TooLarge {
                    actual: received,
                    limit,
                });
            }
            body.extend_from_slice(&chunk);
        }
        let bytes = body.freeze();

        debug!(url = log_url, size = bytes.len(), "Download completed");

        Ok(bytes)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> DownloadError {
    if e.is_timeout() {
        DownloadError::Timeout
    } else {
        // without_url keeps the signature query out of the message
        DownloadError::RequestFailed(e.without_url().to_string())
    }
}
