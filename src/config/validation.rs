use super::models::Config;
use crate::cameras::{CameraRegistry, RegistryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No cameras configured (add at least one [[cameras]] entry)")]
    NoCamerasConfigured,

    #[error("Invalid camera table: {0}")]
    InvalidCamera(#[from] RegistryError),

    #[error("Invalid backend server_url '{url}': {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("Timeout must be positive: {field} = 0")]
    InvalidTimeout { field: String },

    #[error("max_snapshot_bytes must be positive")]
    InvalidMaxSnapshotBytes,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_cameras(config)?;
    validate_backend(config)?;
    Ok(())
}

/// Camera entries must form a bijection (see [`CameraRegistry::new`])
fn validate_cameras(config: &Config) -> Result<(), ValidationError> {
    if config.cameras.is_empty() {
        return Err(ValidationError::NoCamerasConfigured);
    }

    CameraRegistry::new(config.cameras.iter().cloned())?;
    Ok(())
}

fn validate_backend(config: &Config) -> Result<(), ValidationError> {
    let backend = &config.backend;

    let url = reqwest::Url::parse(&backend.server_url).map_err(|e| {
        ValidationError::InvalidBackendUrl {
            url: backend.server_url.clone(),
            reason: e.to_string(),
        }
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::InvalidBackendUrl {
            url: backend.server_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if backend.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "request_timeout_secs".to_string(),
        });
    }
    if backend.connect_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "connect_timeout_secs".to_string(),
        });
    }

    if backend.max_snapshot_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidMaxSnapshotBytes);
    }

    Ok(())
}
