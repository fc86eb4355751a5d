use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use sts_core::error::{StsError, StsResult};

/// Byte-level key-value persistence keyed by (namespace, key).
///
/// The ledger only needs get and put; values are opaque to the store.
pub trait LedgerStore: Send + Sync {
    fn get(&self, namespace: &str, key: &[u8]) -> StsResult<Option<Vec<u8>>>;
    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> StsResult<()>;

    fn contains(&self, namespace: &str, key: &[u8]) -> StsResult<bool> {
        Ok(self.get(namespace, key)?.is_some())
    }
}

/// Heap-backed store. Counts writes so callers can check how many puts an
/// operation performed.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, Vec<u8>), Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful `put` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for MemoryStore {
    fn get(&self, namespace: &str, key: &[u8]) -> StsResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StsError::Storage(e.to_string()))?;
        Ok(entries.get(&(namespace.to_string(), key.to_vec())).cloned())
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> StsResult<()> {
        self.entries
            .write()
            .map_err(|e| StsError::Storage(e.to_string()))?
            .insert((namespace.to_string(), key.to_vec()), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
