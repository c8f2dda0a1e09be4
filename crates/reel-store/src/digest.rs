//! Keccak-256 digests matching the on-chain hashing scheme.
//!
//! The contracts compare these hashes for equality, so the packing here
//! must match what the Solidity side computes byte for byte: a lone
//! string hashes as its raw UTF-8 bytes, and a vote commitment hashes as
//! the tight packing `uint256(vote) ‖ bytes32(salt)`.

use sha3::{Digest, Keccak256};
use std::fmt;

use crate::{Error, Result};

/// Raw Keccak-256 over arbitrary bytes
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// The on-chain key of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingHash(pub [u8; 32]);

impl ListingHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 0x-prefixed 32-byte hex string.
    pub fn parse(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidHash(s.to_string()))?;
        let bytes = hex::decode(body).map_err(|_| Error::InvalidHash(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidHash(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for ListingHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Digest a video id into its on-chain listing key.
///
/// Pure and deterministic; depends on nothing but the id.
pub fn hash_of(video_id: &str) -> ListingHash {
    ListingHash(keccak256(video_id.as_bytes()))
}

/// The secret hash committed on-chain during the commit phase:
/// `keccak256(uint256(vote) ‖ bytes32(salt))`. The raw vote and salt
/// stay off-chain until reveal.
pub fn commit_hash(vote: u8, salt: &str) -> Result<[u8; 32]> {
    let body = salt
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidSalt(salt.to_string()))?;
    let salt_bytes = hex::decode(body).map_err(|_| Error::InvalidSalt(salt.to_string()))?;
    if salt_bytes.len() != 32 {
        return Err(Error::InvalidSalt(salt.to_string()));
    }

    let mut packed = [0u8; 64];
    packed[31] = vote;
    packed[32..].copy_from_slice(&salt_bytes);
    Ok(keccak256(&packed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_known_vectors() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(keccak256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_hash_of_is_deterministic() {
        let a = hash_of("vid-1");
        let b = hash_of("vid-1");
        assert_eq!(a, b);
        assert_ne!(a, hash_of("vid-2"));
    }

    #[test]
    fn test_listing_hash_roundtrip() {
        let h = hash_of("vid-1");
        let parsed = ListingHash::parse(&h.to_string()).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn test_commit_hash_binds_vote_and_salt() {
        let salt = format!("0x{}", "11".repeat(32));
        let yes = commit_hash(1, &salt).unwrap();
        let no = commit_hash(0, &salt).unwrap();
        assert_ne!(yes, no);

        let other_salt = format!("0x{}", "22".repeat(32));
        assert_ne!(yes, commit_hash(1, &other_salt).unwrap());
        assert_eq!(yes, commit_hash(1, &salt).unwrap());
    }

    #[test]
    fn test_commit_hash_rejects_bad_salt() {
        assert!(commit_hash(1, "deadbeef").is_err());
        assert!(commit_hash(1, "0xdeadbeef").is_err());
        assert!(commit_hash(1, "0xzz").is_err());
    }
}
