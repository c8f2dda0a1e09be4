//! Content-addressed storage for the Reel SDK.
//!
//! Metadata blobs live on IPFS keyed by their content hash; the chain
//! side only ever stores the hash. This client covers exactly what the
//! SDK needs: put a JSON value, pin it, read it back.

pub mod client;

pub use client::ContentStore;

/// Result type for IPFS operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid IPFS API url: {0}")]
    InvalidApiUrl(String),

    #[error("IPFS connection failed: {0}")]
    ConnectionFailed(String),

    #[error("content not found: {0}")]
    NotFound(String),

    #[error("pin failed for {hash}: {reason}")]
    PinFailed { hash: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
