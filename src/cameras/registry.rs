use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Backend (motionEye) camera identifier
///
/// Opaque to the gateway, but it ends up inside a directory name
/// (`camera<id>`) and a URL path segment, so only ASCII alphanumerics,
/// `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CameraId(String);

impl CameraId {
    pub fn new(id: impl Into<String>) -> Result<Self, RegistryError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(id))
        } else {
            Err(RegistryError::InvalidId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the per-camera output directory
    pub fn dir_name(&self) -> String {
        format!("camera{}", self.0)
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One camera as written in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraEntry {
    pub name: String,
    pub id: String,
}

impl CameraEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("camera name must not be empty")]
    EmptyName,

    #[error("duplicate camera name '{0}'")]
    DuplicateName(String),

    #[error("camera id '{id}' is shared by '{first}' and '{second}'")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    #[error("invalid camera id '{0}' (expected ASCII letters, digits, '-' or '_')")]
    InvalidId(String),
}

/// Immutable bijection between logical camera names and backend ids
///
/// Names are stored lowercased, lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct CameraRegistry {
    by_name: BTreeMap<String, CameraId>,
    by_id: BTreeMap<CameraId, String>,
}

impl CameraRegistry {
    pub fn new(entries: impl IntoIterator<Item = CameraEntry>) -> Result<Self, RegistryError> {
        let mut by_name: BTreeMap<String, CameraId> = BTreeMap::new();

        for entry in entries {
            let name = entry.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            let id = CameraId::new(entry.id.trim())?;

            if by_name.insert(name.clone(), id).is_some() {
                return Err(RegistryError::DuplicateName(name));
            }
        }

        // Names iterate in order, so `first` is always the lower name.
        let mut by_id: BTreeMap<CameraId, String> = BTreeMap::new();
        for (name, id) in &by_name {
            if let Some(first) = by_id.get(id) {
                return Err(RegistryError::DuplicateId {
                    id: id.to_string(),
                    first: first.clone(),
                    second: name.clone(),
                });
            }
            by_id.insert(id.clone(), name.clone());
        }

        Ok(Self { by_name, by_id })
    }

    pub fn resolve_id(&self, name: &str) -> Option<&CameraId> {
        self.by_name.get(&name.trim().to_lowercase())
    }

    /// Reverse lookup for display purposes
    pub fn resolve_name(&self, id: &CameraId) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    /// All cameras sorted by name
    pub fn list_all(&self) -> Vec<(&str, &CameraId)> {
        self.by_name
            .iter()
            .map(|(name, id)| (name.as_str(), id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
