use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::cameras::{CameraId, CameraRegistry};

#[derive(Debug, Error)]
pub enum PathError {
    #[error("camera not found: {0}")]
    CameraNotFound(String),

    /// Detail is for logs only, never for the client
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// A location inside one camera's output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub camera_id: CameraId,
    pub absolute_path: PathBuf,
}

/// Maps (camera name, untrusted file name) onto the output tree
///
/// Layout: `<output_root>/camera<id>/<file>`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    output_root: PathBuf,
    registry: Arc<CameraRegistry>,
}

impl PathResolver {
    pub fn new(output_root: impl Into<PathBuf>, registry: Arc<CameraRegistry>) -> Self {
        let output_root = output_root.into();
        let output_root = std::path::absolute(&output_root).unwrap_or(output_root);
        Self {
            output_root,
            registry,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn camera_dir(&self, camera_id: &CameraId) -> PathBuf {
        self.output_root.join(camera_id.dir_name())
    }

    /// Resolve a camera name and optional file name to a contained path.
    ///
    /// Without a file the camera directory itself is returned.
    pub fn resolve(
        &self,
        camera_name: &str,
        requested_file: Option<&str>,
    ) -> Result<ResolvedPath, PathError> {
        let camera_id = self
            .registry
            .resolve_id(camera_name)
            .cloned()
            .ok_or_else(|| PathError::CameraNotFound(camera_name.to_string()))?;

        let camera_dir = self.camera_dir(&camera_id);
        let absolute_path = match requested_file {
            None => camera_dir,
            Some(file) => camera_dir.join(contained_relative(file)?),
        };

        Ok(ResolvedPath {
            camera_id,
            absolute_path,
        })
    }

    /// Re-check containment on the canonical filesystem path.
    ///
    /// Catches symlinks inside the camera directory that point elsewhere.
    /// Returns the canonical path of an existing entry.
    pub async fn ensure_contained(&self, resolved: &ResolvedPath) -> Result<PathBuf, PathError> {
        let camera_dir = self.camera_dir(&resolved.camera_id);

        let canonical_root = canonicalize_existing(&camera_dir).await?;
        let canonical = canonicalize_existing(&resolved.absolute_path).await?;

        if canonical.starts_with(&canonical_root) {
            Ok(canonical)
        } else {
            Err(PathError::InvalidPath(format!(
                "{} escapes {}",
                canonical.display(),
                canonical_root.display()
            )))
        }
    }
}

async fn canonicalize_existing(path: &Path) -> Result<PathBuf, PathError> {
    match tokio::fs::canonicalize(path).await {
        Ok(canonical) => Ok(canonical),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PathError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Normalize an untrusted file name as if it were rooted at `/`.
///
/// Empty and `.` segments are dropped; `..` removes the previous segment
/// but never climbs above the root. The result is a relative path made only
/// of normal components, or `InvalidPath` if nothing is left.
pub fn contained_relative(requested: &str) -> Result<PathBuf, PathError> {
    if requested.contains('\0') {
        return Err(PathError::InvalidPath("NUL byte in file name".into()));
    }
    if requested.contains('\\') {
        return Err(PathError::InvalidPath("backslash in file name".into()));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in requested.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(PathError::InvalidPath(format!(
            "'{}' does not name a file",
            requested
        )));
    }

    Ok(segments.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cameras::CameraEntry;
    use std::path::Component;
    use tempfile::TempDir;

    fn resolver(root: &Path) -> PathResolver {
        let registry = CameraRegistry::new(vec![
            CameraEntry::new("main-door", "1"),
            CameraEntry::new("lobby", "2"),
        ])
        .unwrap();
        PathResolver::new(root, Arc::new(registry))
    }

    #[test]
    fn test_resolve_directory() {
        let resolver = resolver(Path::new("/tmp/out"));
        let resolved = resolver.resolve("Lobby", None).unwrap();
        assert_eq!(resolved.camera_id.as_str(), "2");
        assert_eq!(resolved.absolute_path, PathBuf::from("/tmp/out/camera2"));
    }

    #[test]
    fn test_resolve_plain_file() {
        let resolver = resolver(Path::new("/tmp/out"));
        let resolved = resolver.resolve("lobby", Some("20240101_120000.jpg")).unwrap();
        assert_eq!(
            resolved.absolute_path,
            PathBuf::from("/tmp/out/camera2/20240101_120000.jpg")
        );
    }

    #[test]
    fn test_unknown_camera() {
        let resolver = resolver(Path::new("/tmp/out"));
        assert!(matches!(
            resolver.resolve("garage", Some("a.jpg")),
            Err(PathError::CameraNotFound(name)) if name == "garage"
        ));
    }

    #[test]
    fn test_etc_passwd_is_contained() {
        let resolver = resolver(Path::new("/tmp/out"));
        let resolved = resolver
            .resolve("lobby", Some("../../../../etc/passwd"))
            .unwrap();
        assert_ne!(resolved.absolute_path, PathBuf::from("/etc/passwd"));
        assert_eq!(resolved.absolute_path, PathBuf::from("/tmp/out/camera2/etc/passwd"));
    }

    #[test]
    fn test_adversarial_inputs_never_escape() {
        let root = Path::new("/tmp/out");
        let camera_dir = root.join("camera2");
        let resolver = resolver(root);

        let inputs = [
            "/etc/passwd",
            "//etc/passwd",
            "../camera1/secret.jpg",
            "a/../../b.jpg",
            "a/b/../../../../../c.jpg",
            "./../.././x.jpg",
            "....//....//x.jpg",
            "..%2f..%2fx.jpg",
            "a/./b/.//c.jpg",
            "../../../../../../../../../../../../../../../../tmp",
            "x/../../../tmp/out/camera1/y.jpg",
        ];

        for input in inputs {
            let resolved = resolver.resolve("lobby", Some(input)).unwrap();
            let path = &resolved.absolute_path;
            assert!(path.starts_with(&camera_dir), "{input} -> {}", path.display());
            assert_ne!(path, &camera_dir, "{input}");
            assert!(
                path.strip_prefix(&camera_dir)
                    .unwrap()
                    .components()
                    .all(|c| matches!(c, Component::Normal(_))),
                "{input} -> {}",
                path.display()
            );
        }
    }

    #[test]
    fn test_rejected_inputs() {
        let resolver = resolver(Path::new("/tmp/out"));
        for input in ["", "/", "..", "../..", "./", "a/..", "a\0.jpg", "..\\..\\x.jpg"] {
            assert!(
                matches!(resolver.resolve("lobby", Some(input)), Err(PathError::InvalidPath(_))),
                "{input:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_ensure_contained_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver(temp_dir.path());
        let camera_dir = temp_dir.path().join("camera2");
        std::fs::create_dir_all(&camera_dir).unwrap();
        std::fs::write(camera_dir.join("a.jpg"), b"jpeg").unwrap();

        let resolved = resolver.resolve("lobby", Some("a.jpg")).unwrap();
        let canonical = resolver.ensure_contained(&resolved).await.unwrap();
        assert!(canonical.ends_with("camera2/a.jpg"));
    }

    #[tokio::test]
    async fn test_ensure_contained_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("camera2")).unwrap();

        let resolved = resolver.resolve("lobby", Some("missing.jpg")).unwrap();
        assert!(matches!(
            resolver.ensure_contained(&resolved).await,
            Err(PathError::FileNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ensure_contained_rejects_symlink_escape() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver(temp_dir.path());
        let camera_dir = temp_dir.path().join("camera2");
        std::fs::create_dir_all(&camera_dir).unwrap();
        let outside = temp_dir.path().join("outside.txt");
        std::fs::write(&outside, b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, camera_dir.join("link.jpg")).unwrap();

        let resolved = resolver.resolve("lobby", Some("link.jpg")).unwrap();
        assert!(matches!(
            resolver.ensure_contained(&resolved).await,
            Err(PathError::InvalidPath(_))
        ));
    }
}
