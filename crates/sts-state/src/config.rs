use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sts_core::error::{StsError, StsResult};

/// Settings for the sled-backed ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Directory holding the sled database.
    pub data_dir: PathBuf,
    /// Flush to disk after every put instead of relying on sled's background flusher.
    pub flush_on_write: bool,
    /// Page cache size handed to sled.
    pub cache_capacity_bytes: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("sts-data"),
            flush_on_write: false,
            cache_capacity_bytes: 64 * 1024 * 1024,
        }
    }
}

impl LedgerConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Self::default() }
    }

    /// Load from a JSON file. Missing fields fall back to the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> StsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| StsError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> StsResult<Self> {
        serde_json::from_str(json).map_err(|e| StsError::Config(e.to_string()))
    }
}
