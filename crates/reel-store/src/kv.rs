//! Injected key-value persistence.
//!
//! The backing store is whatever the host provides: an embedded database,
//! a flat file, browser storage behind FFI. Both operations are
//! best-effort; implementations swallow their own I/O failures and the
//! SDK treats an absent value and a failed read the same way.

use std::collections::HashMap;
use std::sync::Mutex;

/// Best-effort local string store
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Process-local store, the default for tests and short-lived tools
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.set("k", "v2");
        assert_eq!(store.get("k"), Some("v2".to_string()));
    }
}
