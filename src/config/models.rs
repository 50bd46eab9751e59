use crate::cameras::CameraEntry;
use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cameras: Vec<CameraEntry>,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Document served on `GET /`
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            index_file: default_index_file(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5757))
}

fn default_index_file() -> PathBuf {
    PathBuf::from("./index.html")
}

/// motionEye backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub username: String,
    /// Snapshot signature; may also come from `MOTIONEYE_SIGNATURE`
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_snapshot_bytes")]
    pub max_snapshot_bytes: ByteSize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            username: String::new(),
            signature: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_snapshot_bytes: default_max_snapshot_bytes(),
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:8765".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_snapshot_bytes() -> ByteSize {
    ByteSize(20 * 1000 * 1000) // 20 MB
}

/// Snapshot output tree
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
        }
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

impl Config {
    /// Copy safe to print: the signature is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.backend.signature.is_some() {
            config.backend.signature = Some("<redacted>".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:5757");
        assert_eq!(config.server.index_file, PathBuf::from("./index.html"));
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.backend.max_snapshot_bytes.as_u64(), 20_000_000);
        assert_eq!(config.storage.output_root, PathBuf::from("output"));
        assert!(config.cameras.is_empty());
    }

    #[test]
    fn test_redacted_hides_signature() {
        let mut config = Config::default();
        config.backend.signature = Some("s3cret".to_string());

        let printed = toml::to_string(&config.redacted()).unwrap();
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("<redacted>"));
        assert_eq!(config.backend.signature.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_parse_cameras_table() {
        let config: Config = toml::from_str(
            r#"
[[cameras]]
name = "main-door"
id = "1"

[[cameras]]
name = "lobby"
id = "2"
            "#,
        )
        .unwrap();

        assert_eq!(config.cameras.len(), 2);
        assert_eq!(config.cameras[1], CameraEntry::new("lobby", "2"));
    }
}
