//! Camera identity for the gateway
//!
//! Maps logical camera names (`lobby`, `main-door`) to the identifiers used
//! by the motionEye backend. The registry is built once from configuration
//! and shared read-only between requests.

mod registry;

pub use registry::{CameraEntry, CameraId, CameraRegistry, RegistryError};
