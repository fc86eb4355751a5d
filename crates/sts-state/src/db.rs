use std::path::Path;

use sts_core::error::{StsError, StsResult};

use crate::config::LedgerConfig;
use crate::store::LedgerStore;

/// Persistent ledger store backed by sled (pure-Rust, no C dependencies).
///
/// Each namespace is a named sled tree:
///   STS — project id bytes → encoded token share record
///   STG — project id bytes → encoded crowdfund stage list
pub struct SledStore {
    db: sled::Db,
    flush_on_write: bool,
}

impl SledStore {
    /// Open or create a store at `path` with default settings.
    pub fn open<P: AsRef<Path>>(path: P) -> StsResult<Self> {
        Self::open_with(&LedgerConfig::with_data_dir(path.as_ref()))
    }

    pub fn open_with(config: &LedgerConfig) -> StsResult<Self> {
        let db = sled::Config::new()
            .path(&config.data_dir)
            .cache_capacity(config.cache_capacity_bytes)
            .open()
            .map_err(|e| StsError::Storage(e.to_string()))?;
        tracing::debug!(data_dir = %config.data_dir.display(), "opened ledger store");
        Ok(Self { db, flush_on_write: config.flush_on_write })
    }

    fn tree(&self, namespace: &str) -> StsResult<sled::Tree> {
        self.db
            .open_tree(namespace)
            .map_err(|e| StsError::Storage(e.to_string()))
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> StsResult<()> {
        self.db.flush().map_err(|e| StsError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl LedgerStore for SledStore {
    fn get(&self, namespace: &str, key: &[u8]) -> StsResult<Option<Vec<u8>>> {
        self.tree(namespace)?
            .get(key)
            .map(|v| v.map(|iv| iv.to_vec()))
            .map_err(|e| StsError::Storage(e.to_string()))
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> StsResult<()> {
        self.tree(namespace)?
            .insert(key, value)
            .map_err(|e| StsError::Storage(e.to_string()))?;
        if self.flush_on_write {
            self.flush()?;
        }
        Ok(())
    }

    fn contains(&self, namespace: &str, key: &[u8]) -> StsResult<bool> {
        self.tree(namespace)?
            .contains_key(key)
            .map_err(|e| StsError::Storage(e.to_string()))
    }
}
