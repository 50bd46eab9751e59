//! Configuration management for camgate
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use camgate::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Gateway listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `CAMGATE__<section>__<key>`
//!
//! Examples:
//! - `CAMGATE__SERVER__BIND_ADDR=0.0.0.0:5757`
//! - `CAMGATE__BACKEND__SERVER_URL=http://motioneye:8765`
//! - `CAMGATE__STORAGE__OUTPUT_ROOT=/var/lib/camgate`
//!
//! The backend signature can be supplied as `MOTIONEYE_SIGNATURE` instead of
//! being written into the file.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/camgate.toml`.
//! This can be overridden using the `CAMGATE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{BackendConfig, Config, ServerConfig, StorageConfig};
pub use validation::ValidationError;

use crate::cameras::{CameraRegistry, RegistryError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails
    /// (no cameras, duplicate names or ids, bad backend URL).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(sources::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Build the camera registry from the camera table
    pub fn camera_registry(&self) -> Result<CameraRegistry, RegistryError> {
        CameraRegistry::new(self.cameras.iter().cloned())
    }
}
