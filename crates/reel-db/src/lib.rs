//! Read side of the Reel index database.
//!
//! The index mirrors on-chain and IPFS state into a queryable REST API.
//! This client only reads; writes happen through the chain and the
//! indexer picks them up on its own.

pub mod vids;

pub use vids::{DbClient, VideoRecord};

/// Result type for index operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("index request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("video {0} not found in the index")]
    VideoNotFound(String),
}
