//! Local persistence and hashing for the Reel SDK.
//!
//! The registry contracts key listings by the Keccak-256 digest of the
//! video id. The digest is one-way, so the id has to be cached locally
//! at hashing time if it is ever to be recovered from a hash again; the
//! same store keeps the secret salts of commit-reveal votes between
//! commit and reveal. Persistence is best-effort by design: a missing
//! backing store degrades to a warning, never a failure, because only
//! local convenience state is at risk.

pub mod digest;
pub mod hash_store;
pub mod kv;

pub use digest::{commit_hash, hash_of, keccak256, ListingHash};
pub use hash_store::{HashStore, HASH_TO_ID_PREFIX, SALT_PREFIX};
pub use kv::{KvStore, MemoryStore};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid salt {0:?}: expected 0x-prefixed 32-byte hex")]
    InvalidSalt(String),

    #[error("invalid hash {0:?}: expected 0x-prefixed 32-byte hex")]
    InvalidHash(String),
}
