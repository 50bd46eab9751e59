use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use super::paths::ResolvedPath;
use crate::humanize::ByteSize;

#[derive(Debug, Error)]
pub enum ListError {
    /// Directory missing or holding no visible entries
    #[error("camera output directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read camera output directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size_bytes: u64,
    pub is_directory: bool,
}

impl FileEntry {
    pub fn size_display(&self) -> String {
        ByteSize(self.size_bytes).to_si_string()
    }
}

/// List a camera directory sorted by name.
///
/// Hidden entries (including in-flight `.part` files) are skipped.
pub async fn list_directory(resolved: &ResolvedPath) -> Result<Vec<FileEntry>, ListError> {
    let dir = &resolved.absolute_path;

    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ListError::NotFound(dir.clone()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            warn!(dir = %dir.display(), "Skipping entry with non UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let metadata = entry.metadata().await?;
        entries.push(FileEntry {
            name,
            size_bytes: metadata.len(),
            is_directory: metadata.is_dir(),
        });
    }

    if entries.is_empty() {
        return Err(ListError::NotFound(dir.clone()));
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(camera_id = %resolved.camera_id, count = entries.len(), "Listed camera directory");

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cameras::CameraId;
    use std::fs;
    use tempfile::TempDir;

    fn resolved(path: PathBuf) -> ResolvedPath {
        ResolvedPath {
            camera_id: CameraId::new("2").unwrap(),
            absolute_path: path,
        }
    }

    #[tokio::test]
    async fn test_lists_sorted_with_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("camera2");
        fs::create_dir_all(dir.join("archive")).unwrap();
        fs::write(dir.join("20240102_000000.jpg"), vec![0u8; 1500]).unwrap();
        fs::write(dir.join("20240101_000000.jpg"), vec![0u8; 10]).unwrap();

        let entries = list_directory(&resolved(dir)).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["20240101_000000.jpg", "20240102_000000.jpg", "archive"]);

        assert_eq!(entries[0].size_bytes, 10);
        assert_eq!(entries[0].size_display(), "10 B");
        assert_eq!(entries[1].size_display(), "1.5 kB");
        assert!(!entries[1].is_directory);
        assert!(entries[2].is_directory);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = list_directory(&resolved(temp_dir.path().join("camera2"))).await;
        assert!(matches!(result, Err(ListError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("camera2");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(".20240101_000000.jpg.abc.part"), b"partial").unwrap();

        let result = list_directory(&resolved(dir)).await;
        assert!(matches!(result, Err(ListError::NotFound(_))));
    }
}
