//! Local snapshot storage
//!
//! Snapshots live under `<output_root>/camera<id>/<YYYYMMDD_HHMMSS>.jpg`.
//! [`PathResolver`] is the only way request input reaches this tree; it
//! keeps every resolved path inside the camera's own directory.

mod listing;
mod paths;

pub use listing::{FileEntry, ListError, list_directory};
pub use paths::{PathError, PathResolver, ResolvedPath, contained_relative};
