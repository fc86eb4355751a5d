use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of per-(namespace, key) mutexes.
///
/// A read-modify-write on one key runs inside that key's critical section;
/// operations on different keys never wait on each other. An entry lives only
/// while some caller holds or waits on it, so the registry is bounded by the
/// number of concurrent callers.
#[derive(Default)]
pub struct KeyLocks {
    slots: Mutex<HashMap<(&'static str, Vec<u8>), Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `(namespace, key)`.
    pub fn with_key<T>(&self, namespace: &'static str, key: &[u8], f: impl FnOnce() -> T) -> T {
        let slot = {
            // The registry and the slots guard no data, so a poisoned lock
            // is still usable.
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry((namespace, key.to_vec())).or_default())
        };
        let out = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        self.release(namespace, key, slot);
        out
    }

    /// Number of keys currently held or waited on.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, namespace: &'static str, key: &[u8], slot: Arc<Mutex<()>>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Registry plus our clone: nobody else holds or waits on this key.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&(namespace, key.to_vec()));
        }
    }
}
