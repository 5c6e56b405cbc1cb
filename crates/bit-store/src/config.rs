use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for [`FsObjectStore`](crate::FsObjectStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsStoreConfig {
    /// Directory holding the loose objects.
    pub root: PathBuf,
    /// Recompute the hash of every object read and reject mismatches.
    pub verify_on_read: bool,
    /// `fsync` each object file before it is moved into place.
    pub fsync: bool,
}

impl Default for FsStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".bit/objects"),
            verify_on_read: true,
            fsync: false,
        }
    }
}

impl FsStoreConfig {
    /// Default configuration rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }
}
