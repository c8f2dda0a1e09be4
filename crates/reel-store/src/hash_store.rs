//! Hash↔id cache and vote-salt storage.

use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;

use crate::digest::{hash_of, ListingHash};
use crate::kv::KvStore;

/// Key prefix for hash → video id entries
pub const HASH_TO_ID_PREFIX: &str = "HASH_KEY_";
/// Key prefix for video id → salt entries
pub const SALT_PREFIX: &str = "SALT_KEY_";

/// Local cache of listing hashes and commit-reveal salts.
///
/// Losing a cached salt makes the corresponding vote unrevealable; that
/// risk sits with the host's choice of backing store, not with this
/// type.
#[derive(Clone)]
pub struct HashStore {
    kv: Option<Arc<dyn KvStore>>,
}

impl HashStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv: Some(kv) }
    }

    /// A store with no persistence at all. Hashing still works; reverse
    /// lookups and salt retrieval will come up empty.
    pub fn detached() -> Self {
        Self { kv: None }
    }

    /// Digest a video id into its on-chain key. Pure, no persistence.
    pub fn hash_of(&self, video_id: &str) -> ListingHash {
        hash_of(video_id)
    }

    /// Digest and remember the id under the hash for reverse lookup.
    /// Never fails: with no backing store the hash is still returned and
    /// a degradation warning is logged.
    pub fn get_and_store_hash(&self, video_id: &str) -> ListingHash {
        let hash = hash_of(video_id);
        match &self.kv {
            Some(kv) => kv.set(&format!("{HASH_TO_ID_PREFIX}{hash}"), video_id),
            None => {
                tracing::warn!(video_id, "no local store attached, hash -> id mapping will be lost")
            }
        }
        hash
    }

    /// Reverse lookup of a previously stored hash.
    pub fn hash_to_id(&self, hash: &ListingHash) -> Option<String> {
        match &self.kv {
            Some(kv) => kv.get(&format!("{HASH_TO_ID_PREFIX}{hash}")),
            None => {
                tracing::warn!(%hash, "no local store attached, hash -> id lookup unavailable");
                None
            }
        }
    }

    pub fn store_salt(&self, video_id: &str, salt: &str) {
        match &self.kv {
            Some(kv) => kv.set(&format!("{SALT_PREFIX}{video_id}"), salt),
            None => {
                tracing::warn!(video_id, "no local store attached, vote salt will be lost");
            }
        }
    }

    pub fn salt(&self, video_id: &str) -> Option<String> {
        match &self.kv {
            Some(kv) => kv.get(&format!("{SALT_PREFIX}{video_id}")),
            None => {
                tracing::warn!(video_id, "no local store attached, vote salt unavailable");
                None
            }
        }
    }

    /// Cryptographically random salt of `size_bytes` bytes, 0x-hex encoded.
    pub fn generate_salt(&self, size_bytes: usize) -> String {
        let mut bytes = vec![0u8; size_bytes];
        OsRng.fill_bytes(&mut bytes);
        format!("0x{}", hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn store() -> HashStore {
        HashStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_hash_roundtrip_through_cache() {
        let store = store();
        let hash = store.get_and_store_hash("vid-1");
        assert_eq!(store.hash_to_id(&hash), Some("vid-1".to_string()));
    }

    #[test]
    fn test_unknown_hash_is_absent() {
        let store = store();
        let hash = store.hash_of("never-stored");
        assert_eq!(store.hash_to_id(&hash), None);
    }

    #[test]
    fn test_salt_roundtrip() {
        let store = store();
        let salt = store.generate_salt(32);
        store.store_salt("vid-1", &salt);
        assert_eq!(store.salt("vid-1"), Some(salt));
        assert_eq!(store.salt("vid-2"), None);
    }

    #[test]
    fn test_generated_salts_are_fresh() {
        let store = store();
        let a = store.generate_salt(32);
        let b = store.generate_salt(32);
        assert_ne!(a, b);
        assert_eq!(a.len(), 2 + 64);
        assert!(a.starts_with("0x"));
    }

    #[test]
    fn test_detached_store_degrades_without_failing() {
        let store = HashStore::detached();
        let hash = store.get_and_store_hash("vid-1");
        assert_eq!(hash, store.hash_of("vid-1"));
        assert_eq!(store.hash_to_id(&hash), None);
        store.store_salt("vid-1", "0xabc");
        assert_eq!(store.salt("vid-1"), None);
    }
}
